//! Google Gemini LLM provider implementation.
//!
//! This module provides the [`GeminiProvider`] which implements the
//! [`LlmProvider`](gemchat_core::llm::provider::LlmProvider) trait for
//! the Gemini `streamGenerateContent` API with SSE streaming.

pub mod client;
pub mod streaming;
pub mod types;

pub use client::GeminiProvider;
