use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Pages of the simulated user application.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Route {
    #[default]
    Dashboard,
    Profile,
    Settings,
}

impl Route {
    pub const ALL: [Route; 3] = [Route::Dashboard, Route::Profile, Route::Settings];

    /// Wire and prompt name of the route.
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Dashboard => "DASHBOARD",
            Route::Profile => "PROFILE",
            Route::Settings => "SETTINGS",
        }
    }

    /// Fixed description of the interactive elements the page shows.
    pub fn visible_elements(&self) -> &'static str {
        match self {
            Route::Dashboard => "Transaction Cards, Navigation Menu",
            Route::Profile => "Name Input, Email Input, Save Button",
            Route::Settings => "Notifications Toggle, Help Links",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Route {
    type Err = String;

    /// Accepts the wire name in any letter case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DASHBOARD" => Ok(Route::Dashboard),
            "PROFILE" => Ok(Route::Profile),
            "SETTINGS" => Ok(Route::Settings),
            _ => Err(format!("unknown route: {}", s)),
        }
    }
}
