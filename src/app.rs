//! App Core for Cobrowse.
//!
//! Holds the configuration, the session registry and the advisory builder
//! that the RPC server and the console demo drive.

use std::sync::Arc;

use crate::managers::session_registry::{SessionHandle, SessionRegistry};
use crate::managers::session_store::SessionStoreTrait;
use crate::services::advisory_builder::AdvisoryRequestBuilder;
use crate::services::advisory_service::{AdvisoryService, GeminiAdvisoryService};
use crate::services::config_engine::{ConfigEngine, ConfigEngineTrait};
use crate::types::advisory::ChatRole;
use crate::types::config::SimulatorConfig;

/// Central application struct.
pub struct App {
    pub config: SimulatorConfig,
    pub registry: SessionRegistry,
    pub advisor: AdvisoryRequestBuilder,
}

impl App {
    /// Creates an App talking to the configured HTTP advisory service.
    pub fn new(config: SimulatorConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let service = GeminiAdvisoryService::from_settings(&config.advisory)
            .map_err(|e| format!("advisory client init failed: {}", e))?;
        Ok(Self::with_service(config, Arc::new(service)))
    }

    /// Creates an App with a caller-supplied advisory service (tests, demos).
    pub fn with_service(config: SimulatorConfig, service: Arc<dyn AdvisoryService>) -> Self {
        let registry = SessionRegistry::from_config(&config);
        let advisor =
            AdvisoryRequestBuilder::new(service).with_default_query(&config.advisory.default_query);
        Self {
            config,
            registry,
            advisor,
        }
    }

    /// Loads the config file (see [`ConfigEngine::new`]) and builds the App.
    pub fn from_config_file(path_override: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut engine = ConfigEngine::new(path_override);
        let config = engine.load()?;
        Self::new(config)
    }

    /// Requests advice for the session's current screen and records the
    /// exchange in its transcript. Reads the store, never writes it.
    pub async fn advise(&self, session: &SessionHandle, query: &str) -> String {
        let state = session.store.get_state();
        let asked = if query.trim().is_empty() {
            self.config.advisory.default_query.as_str()
        } else {
            query
        };
        session.record(ChatRole::Admin, asked);
        let advice = self
            .advisor
            .request_advice(state.route, query, &state.form_state)
            .await;
        session.record(ChatRole::System, &advice);
        advice
    }
}
