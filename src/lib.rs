//! Cobrowse: co-browsing session simulator.
//!
//! A user device view and an admin console share one session: the user's
//! route, scroll offset and form input are mirrored to the admin, and the
//! admin can place a timed guidance cue on the user's screen.
//!
//! This library crate exposes all modules for use by the binaries and integration tests.

pub mod app;
pub mod managers;
pub mod platform;
pub mod rpc_events;
pub mod rpc_handler;
pub mod services;
pub mod types;
