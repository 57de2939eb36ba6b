//! LLM provider abstractions for gemchat.
//!
//! - `LlmProvider`: streaming chat backend implemented in `gemchat-infra`
//! - `ProviderFactory`: builds a provider from a credential and model id

pub mod provider;
