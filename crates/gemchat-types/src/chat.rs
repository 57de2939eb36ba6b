//! Chat transcript types for gemchat.
//!
//! A transcript is an ordered list of [`ChatTurn`]s exchanged between the
//! user and the assistant within one browser session.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Stored in place of an assistant answer whose stream failed.
pub const FALLBACK_REPLY: &str = "I'm sorry, I encountered an error.";

/// Who authored a turn in the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnRole::User => write!(f, "user"),
            TurnRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for TurnRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(TurnRole::User),
            "assistant" => Ok(TurnRole::Assistant),
            other => Err(format!("invalid turn role: '{other}'")),
        }
    }
}

/// One message exchanged between the user and the assistant.
///
/// Turns are created on user submit or when an assistant stream finishes
/// and are never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_role_roundtrip() {
        for role in [TurnRole::User, TurnRole::Assistant] {
            let parsed: TurnRole = role.to_string().parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_turn_role_rejects_model() {
        assert!("model".parse::<TurnRole>().is_err());
    }

    #[test]
    fn test_chat_turn_serde_shape() {
        let turn = ChatTurn::assistant("Hi there");
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "Hi there");

        let parsed: ChatTurn =
            serde_json::from_str(r#"{"role":"user","content":"Hello"}"#).unwrap();
        assert_eq!(parsed, ChatTurn::user("Hello"));
    }
}
