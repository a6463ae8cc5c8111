// Cobrowse Config Engine
// Loads, edits and saves the simulator configuration.
// Stored as a JSON file at the platform config path unless overridden.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::platform;
use crate::types::config::SimulatorConfig;
use crate::types::errors::ConfigError;

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "COBROWSE_CONFIG";

/// Trait defining the config engine interface.
pub trait ConfigEngineTrait {
    fn load(&mut self) -> Result<SimulatorConfig, ConfigError>;
    fn save(&self) -> Result<(), ConfigError>;
    fn get_config(&self) -> &SimulatorConfig;
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), ConfigError>;
    fn reset(&mut self) -> Result<(), ConfigError>;
    fn get_config_path(&self) -> &str;
}

/// JSON-file backed configuration.
pub struct ConfigEngine {
    config_path: String,
    config: SimulatorConfig,
}

impl ConfigEngine {
    /// Uses `path_override` when given, then `$COBROWSE_CONFIG`, then
    /// `config.json` in the platform config directory.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = path_override
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().filter(|p| !p.is_empty()))
            .unwrap_or_else(|| {
                platform::get_config_dir()
                    .join("config.json")
                    .to_string_lossy()
                    .to_string()
            });

        Self {
            config_path,
            config: SimulatorConfig::default(),
        }
    }
}

impl ConfigEngineTrait for ConfigEngine {
    /// Missing file → defaults. Malformed file → error. Missing sections or
    /// fields fall back to their defaults.
    fn load(&mut self) -> Result<SimulatorConfig, ConfigError> {
        let path = Path::new(&self.config_path);
        if !path.exists() {
            self.config = SimulatorConfig::default();
            return Ok(self.config.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("Failed to read config file: {}", e)))?;
        self.config = serde_json::from_str(&content).map_err(|e| {
            ConfigError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;
        Ok(self.config.clone())
    }

    fn save(&self) -> Result<(), ConfigError> {
        let path = Path::new(&self.config_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.config).map_err(|e| {
            ConfigError::SerializationError(format!("Failed to serialize config: {}", e))
        })?;
        fs::write(path, json)
            .map_err(|e| ConfigError::IoError(format!("Failed to write config file: {}", e)))
    }

    fn get_config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Sets one field by dot path (`"cue.duration_ms"`) and saves.
    ///
    /// The edited document is deserialized again before it is accepted, so a
    /// value of the wrong type is rejected and the previous config kept.
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), ConfigError> {
        if key.is_empty() {
            return Err(ConfigError::InvalidKey("Key cannot be empty".to_string()));
        }

        let mut document = serde_json::to_value(&self.config).map_err(|e| {
            ConfigError::SerializationError(format!("Failed to serialize config: {}", e))
        })?;

        let (parents, leaf) = match key.rsplit_once('.') {
            Some((parents, leaf)) => (parents.split('.').collect::<Vec<_>>(), leaf),
            None => (Vec::new(), key),
        };

        let mut current = &mut document;
        for part in parents {
            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::InvalidKey(format!("Key '{}' not found in config", key)))?;
        }
        match current {
            Value::Object(map) if map.contains_key(leaf) => {
                map.insert(leaf.to_string(), value);
            }
            Value::Object(_) => {
                return Err(ConfigError::InvalidKey(format!("Key '{}' not found in config", key)));
            }
            _ => {
                return Err(ConfigError::InvalidKey(format!(
                    "Cannot navigate to key '{}': intermediate value is not an object",
                    key
                )));
            }
        }

        self.config = serde_json::from_value(document).map_err(|e| {
            ConfigError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;
        self.save()
    }

    fn reset(&mut self) -> Result<(), ConfigError> {
        self.config = SimulatorConfig::default();
        self.save()
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
