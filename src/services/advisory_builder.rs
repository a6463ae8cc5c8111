//! Advisory Request Builder.
//!
//! Turns a read-only snapshot of the session (route, form values, what the
//! page shows) plus the admin's question into one prompt, sends it to the
//! advisory service, and always hands back text. Every failure degrades to a
//! fixed message.

use std::sync::Arc;

use tracing::warn;

use crate::services::advisory_service::AdvisoryService;
use crate::types::advisory::AdvisoryRequest;
use crate::types::errors::AdvisoryError;
use crate::types::form::FormState;
use crate::types::route::Route;

/// Returned when no credential is configured.
pub const MISSING_CREDENTIALS_MESSAGE: &str = "AI Service Unavailable: Missing API Key.";
/// Returned when the service answers with no text.
pub const EMPTY_ADVICE_MESSAGE: &str = "No suggestion available.";
/// Returned for any other failure.
pub const DEGRADED_MESSAGE: &str = "Unable to generate advice at this time.";

/// Question used when the admin leaves the query blank.
pub const DEFAULT_QUERY: &str = "How do I help the user?";

pub struct AdvisoryRequestBuilder {
    service: Arc<dyn AdvisoryService>,
    default_query: String,
}

impl AdvisoryRequestBuilder {
    pub fn new(service: Arc<dyn AdvisoryService>) -> Self {
        Self {
            service,
            default_query: DEFAULT_QUERY.to_string(),
        }
    }

    pub fn with_default_query(mut self, query: &str) -> Self {
        self.default_query = query.to_string();
        self
    }

    /// Describes what is on screen: form values as JSON and the route's
    /// interactive elements.
    pub fn screen_context(route: Route, form: &FormState) -> String {
        let form_json = serde_json::to_string(form).unwrap_or_else(|_| "{}".to_string());
        format!(
            "Form Data: {}\nInteractive Elements: {}",
            form_json,
            route.visible_elements()
        )
    }

    /// Full prompt text sent to the service.
    pub fn compose_prompt(&self, route: Route, user_query: &str, form: &FormState) -> String {
        let query = if user_query.trim().is_empty() {
            self.default_query.as_str()
        } else {
            user_query
        };
        format!(
            "You are an expert technical support agent assisting a user in real-time.\n\
             \n\
             Context:\n\
             - The user is currently on the \"{route}\" page.\n\
             - Visible elements/Screen state: {context}\n\
             - The user (or admin) is asking: \"{query}\"\n\
             \n\
             Task:\n\
             Provide a short, actionable suggestion for the Admin to tell the user.\n\
             Explain exactly where the Admin should click to guide the user \
             (e.g., \"Click the blue 'Save' button in the top right\").\n\
             Keep it under 2 sentences.",
            route = route,
            context = Self::screen_context(route, form),
            query = query,
        )
    }

    /// Asks the advisory service for guidance. Never fails.
    pub async fn request_advice(
        &self,
        route: Route,
        user_query: &str,
        form_snapshot: &FormState,
    ) -> String {
        let request = AdvisoryRequest {
            prompt_text: self.compose_prompt(route, user_query, form_snapshot),
        };

        match self.service.generate(&request).await {
            Ok(response) if response.text.trim().is_empty() => EMPTY_ADVICE_MESSAGE.to_string(),
            Ok(response) => response.text,
            Err(AdvisoryError::MissingCredentials) => {
                warn!("advisory service has no API key configured");
                MISSING_CREDENTIALS_MESSAGE.to_string()
            }
            Err(err) => {
                warn!(error = %err, "advisory request failed");
                DEGRADED_MESSAGE.to_string()
            }
        }
    }
}
