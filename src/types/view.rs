use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::route::Route;

/// Which side of the session a surface belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ViewRole {
    /// The user's interactive device view.
    User,
    /// The admin's read-only mirror.
    Admin,
}

impl FromStr for ViewRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(ViewRole::User),
            "admin" => Ok(ViewRole::Admin),
            _ => Err(format!("unknown view role: {}", s)),
        }
    }
}

/// What a renderer needs to draw one frame of a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewFrame {
    pub role: ViewRole,
    pub route: Route,
    pub interactive: bool,
    pub scroll_offset: f64,
    /// Cue marker centre in surface pixels; absent when no cue should render.
    pub cue_pixels: Option<(f64, f64)>,
}
