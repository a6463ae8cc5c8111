// Cobrowse services
// Services hold no session state: coordinate mapping, view projection, advisory requests, config and logging.

pub mod advisory_builder;
pub mod advisory_service;
pub mod config_engine;
pub mod coordinate_mapper;
pub mod logging;
pub mod view_projection;
