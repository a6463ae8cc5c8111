use serde::{Deserialize, Serialize};

/// Request sent to the external advisory service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryRequest {
    pub prompt_text: String,
}

/// Free-text answer from the advisory service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdvisoryResponse {
    pub text: String,
}

/// Author of a guidance transcript entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    Admin,
    User,
    System,
}

/// One entry in a session's in-memory guidance transcript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub text: String,
    pub timestamp: i64,
}
