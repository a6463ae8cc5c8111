// Cobrowse state managers
// Managers own session state: the store, the cue lifecycle, navigation and the session registry.

pub mod cue_controller;
pub mod navigation_controller;
pub mod session_registry;
pub mod session_store;
