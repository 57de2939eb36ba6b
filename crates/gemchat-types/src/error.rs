use thiserror::Error;

use crate::llm::LlmError;

/// Errors that abort a chat turn before anything is added to the transcript.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Please enter your Gemini API Key in the sidebar to continue.")]
    MissingApiKey,

    #[error("Error configuring API: {0}")]
    Configuration(String),
}

impl From<LlmError> for ChatError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Configuration(msg) => ChatError::Configuration(msg),
            other => ChatError::Configuration(other.to_string()),
        }
    }
}

/// Errors related to loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}
