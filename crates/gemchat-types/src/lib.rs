//! Shared domain types for gemchat.
//!
//! Chat turns, the model-facing history shape, streaming events, errors and
//! configuration.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
