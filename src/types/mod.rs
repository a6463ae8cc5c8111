// Cobrowse shared type definitions
// Each submodule defines types used across the session, controllers and services.

pub mod advisory;
pub mod config;
pub mod coordinate;
pub mod errors;
pub mod form;
pub mod route;
pub mod session;
pub mod view;
