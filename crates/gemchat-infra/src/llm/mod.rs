//! LLM provider implementations.
//!
//! Contains the Gemini implementation of the [`LlmProvider`] trait defined
//! in `gemchat-core`, and the [`GeminiProviderFactory`] that builds one per
//! chat turn from the credential the user typed into the page.
//!
//! [`LlmProvider`]: gemchat_core::llm::provider::LlmProvider

pub mod gemini;

use secrecy::SecretString;

use gemchat_core::llm::provider::{BoxLlmProvider, ProviderFactory};
use gemchat_types::llm::LlmError;

use self::gemini::GeminiProvider;

/// Builds [`GeminiProvider`]s against a fixed API base URL.
#[derive(Debug, Clone)]
pub struct GeminiProviderFactory {
    base_url: String,
}

impl GeminiProviderFactory {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl ProviderFactory for GeminiProviderFactory {
    fn create(&self, api_key: SecretString, model: &str) -> Result<BoxLlmProvider, LlmError> {
        let provider = GeminiProvider::new(api_key, model, &self.base_url)?;
        Ok(Box::new(provider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_creates_gemini_provider() {
        let factory = GeminiProviderFactory::new("https://generativelanguage.googleapis.com");
        let provider = factory
            .create(SecretString::from("k"), "gemini-2.5-flash")
            .unwrap();
        assert_eq!(provider.name(), "gemini");
    }

    #[test]
    fn test_factory_rejects_bad_model() {
        let factory = GeminiProviderFactory::new("https://generativelanguage.googleapis.com");
        assert!(factory.create(SecretString::from("k"), "bad model").is_err());
    }
}
