use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::coordinate::Coordinate;
use super::form::FormState;
use super::route::Route;

/// Identifies one paired user/admin session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Snapshot of everything both views render from.
///
/// Owned by the session store; callers only ever receive clones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub route: Route,
    pub form_state: FormState,
    pub scroll_position: f64,
    pub cue_coordinate: Option<Coordinate>,
    pub cue_active: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            route: Route::Dashboard,
            form_state: FormState::initial(),
            scroll_position: 0.0,
            cue_coordinate: None,
            cue_active: false,
        }
    }
}

impl SessionState {
    /// Cue position to draw, if any. Requires both a coordinate and the active flag.
    pub fn visible_cue(&self) -> Option<Coordinate> {
        if self.cue_active {
            self.cue_coordinate
        } else {
            None
        }
    }
}

/// Pushed to subscribers after every state change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionEvent {
    pub session_id: SessionId,
    pub revision: u64,
    pub state: SessionState,
}

/// The two states of the cue lifecycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CuePhase {
    Idle,
    Active,
}
