//! LLM request/response types for gemchat.
//!
//! These types model the chat-session shape expected by the generative
//! language API: a history of role-tagged entries made of text parts, a new
//! user message, and the events emitted while the reply streams back.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::chat::{ChatTurn, TurnRole};

/// Role of an entry in the model's chat history.
///
/// The API only knows `user` and `model`; assistant turns are sent as `model`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelRole {
    User,
    Model,
}

impl fmt::Display for ModelRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelRole::User => write!(f, "user"),
            ModelRole::Model => write!(f, "model"),
        }
    }
}

impl From<TurnRole> for ModelRole {
    fn from(role: TurnRole) -> Self {
        match role {
            TurnRole::User => ModelRole::User,
            TurnRole::Assistant => ModelRole::Model,
        }
    }
}

/// A text part inside a history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// One prior turn in the shape the model API expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: ModelRole,
    pub parts: Vec<Part>,
}

impl HistoryEntry {
    pub fn text(role: ModelRole, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part { text: text.into() }],
        }
    }
}

impl From<&ChatTurn> for HistoryEntry {
    fn from(turn: &ChatTurn) -> Self {
        HistoryEntry::text(turn.role.into(), turn.content.clone())
    }
}

/// A streaming chat request: a session seeded with `history`, then `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub history: Vec<HistoryEntry>,
    pub message: String,
}

/// Token usage reported by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Events emitted during a streaming reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// A fragment of reply text. May be empty.
    TextDelta { text: String },

    /// The candidate finished with the given provider reason string.
    Finished { reason: String },

    /// Token usage information.
    Usage(Usage),

    /// The stream has completed.
    Done,
}

/// Errors from LLM provider operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("stream error: {0}")]
    Stream(String),

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("prompt blocked: {0}")]
    Blocked(String),

    #[error("invalid provider configuration: {0}")]
    Configuration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_mapping_is_total() {
        assert_eq!(ModelRole::from(TurnRole::User), ModelRole::User);
        assert_eq!(ModelRole::from(TurnRole::Assistant), ModelRole::Model);
    }

    #[test]
    fn test_history_entry_wire_shape() {
        let entry = HistoryEntry::from(&ChatTurn::assistant("B"));
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"role":"model","parts":[{"text":"B"}]}"#);
    }

    #[test]
    fn test_stream_event_serde() {
        let event = StreamEvent::TextDelta {
            text: "Hel".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "text_delta");
        assert_eq!(json["text"], "Hel");
    }

    #[test]
    fn test_llm_error_display() {
        let err = LlmError::InvalidRequest("API key not valid".to_string());
        assert_eq!(err.to_string(), "invalid request: API key not valid");
    }
}
