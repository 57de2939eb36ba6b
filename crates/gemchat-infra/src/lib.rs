//! Infrastructure layer for gemchat.
//!
//! Implements the provider traits defined in `gemchat-core` against the
//! Gemini REST API, and loads the optional `config.toml`.

pub mod config;
pub mod llm;
