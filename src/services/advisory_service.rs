//! Advisory service interface and its HTTP implementation.
//!
//! The advisory service is an external text-generation provider: one prompt
//! in, free text out. [`GeminiAdvisoryService`] talks to a Gemini-style
//! `generateContent` endpoint; tests substitute their own implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::types::advisory::{AdvisoryRequest, AdvisoryResponse};
use crate::types::config::AdvisorySettings;
use crate::types::errors::AdvisoryError;

/// Anything that turns a prompt into advice text.
#[async_trait]
pub trait AdvisoryService: Send + Sync {
    /// Single attempt, no retry.
    async fn generate(&self, request: &AdvisoryRequest) -> Result<AdvisoryResponse, AdvisoryError>;
}

/// Client for a Gemini-compatible `models/{model}:generateContent` API.
pub struct GeminiAdvisoryService {
    http: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiAdvisoryService {
    /// Builds a client, reading the API key from the configured environment
    /// variable. A missing or empty variable is not an error here; requests
    /// then fail as unavailable.
    pub fn from_settings(settings: &AdvisorySettings) -> Result<Self, AdvisoryError> {
        let api_key = std::env::var(&settings.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());
        Self::new(
            &settings.endpoint,
            &settings.model,
            api_key,
            Duration::from_secs(settings.timeout_secs),
        )
    }

    pub fn new(
        endpoint: &str,
        model: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AdvisoryError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AdvisoryError::ServiceError(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl AdvisoryService for GeminiAdvisoryService {
    async fn generate(&self, request: &AdvisoryRequest) -> Result<AdvisoryResponse, AdvisoryError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AdvisoryError::MissingCredentials)?;

        let body = json!({
            "contents": [{ "parts": [{ "text": request.prompt_text }] }]
        });

        debug!(model = %self.model, prompt_len = request.prompt_text.len(), "requesting advice");
        let response = self
            .http
            .post(self.url())
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    AdvisoryError::Unavailable(e.to_string())
                } else {
                    AdvisoryError::ServiceError(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AdvisoryError::Unavailable(format!("credential rejected ({})", status)));
        }
        if !status.is_success() {
            return Err(AdvisoryError::ServiceError(format!("unexpected status {}", status)));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AdvisoryError::ServiceError(format!("malformed response: {}", e)))?;

        Ok(AdvisoryResponse { text: parsed.text() })
    }
}
