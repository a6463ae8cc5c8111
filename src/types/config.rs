use serde::{Deserialize, Serialize};

use super::coordinate::SurfaceSize;

/// Top-level simulator configuration container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SimulatorConfig {
    #[serde(default)]
    pub cue: CueSettings,
    #[serde(default)]
    pub surface: SurfaceSettings,
    #[serde(default)]
    pub advisory: AdvisorySettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Timing of the guidance cue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CueSettings {
    /// Milliseconds a cue stays visible after its most recent trigger.
    pub duration_ms: u64,
}

impl Default for CueSettings {
    fn default() -> Self {
        Self { duration_ms: 5000 }
    }
}

/// Logical reference rectangle both views agree on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SurfaceSettings {
    pub reference_width: f64,
    pub reference_height: f64,
    pub device_name: String,
    /// Uniform scale the admin mirror renders the reference rectangle at.
    pub mirror_scale: f64,
}

impl Default for SurfaceSettings {
    fn default() -> Self {
        Self {
            reference_width: 375.0,
            reference_height: 667.0,
            device_name: "iPhone SE".to_string(),
            mirror_scale: 0.85,
        }
    }
}

impl SurfaceSettings {
    pub fn reference_surface(&self) -> SurfaceSize {
        SurfaceSize::new(self.reference_width, self.reference_height)
    }

    pub fn mirror_surface(&self) -> SurfaceSize {
        self.reference_surface().scaled(self.mirror_scale)
    }
}

/// External advisory (text-generation) service settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AdvisorySettings {
    pub endpoint: String,
    pub model: String,
    /// Environment variable holding the API key. The key itself is never stored.
    pub api_key_env: String,
    pub timeout_secs: u64,
    pub default_query: String,
}

impl Default for AdvisorySettings {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            api_key_env: "API_KEY".to_string(),
            timeout_secs: 30,
            default_query: "How do I help the user?".to_string(),
        }
    }
}

/// Per-session settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionSettings {
    pub user_display_name: String,
    /// Capacity of each session's event channel before slow subscribers lag.
    pub event_buffer: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            user_display_name: "John Doe".to_string(),
            event_buffer: 256,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default `tracing` filter directive; `RUST_LOG` takes precedence.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}
