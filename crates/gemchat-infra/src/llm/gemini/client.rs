//! GeminiProvider -- concrete [`LlmProvider`] for the Gemini REST API.
//!
//! Streams replies from
//! `/v1beta/models/{model}:streamGenerateContent?alt=sse`, authenticating
//! with the `x-goog-api-key` header.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use secrecy::SecretString;

use gemchat_core::llm::provider::{EventStream, LlmProvider};
use gemchat_types::llm::{ChatRequest, HistoryEntry, LlmError, ModelRole};

use super::streaming::create_gemini_stream;
use super::types::GenerateContentRequest;

/// Gemini LLM provider.
///
/// Construction validates inputs and builds the HTTP client but performs no
/// network I/O.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    ///
    /// # Errors
    ///
    /// [`LlmError::Configuration`] if the model id or base URL is unusable
    /// or the HTTP client cannot be built.
    pub fn new(api_key: SecretString, model: &str, base_url: &str) -> Result<Self, LlmError> {
        validate_model_id(model)?;

        let base_url = base_url.trim_end_matches('/');
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(LlmError::Configuration(format!(
                "invalid API base URL '{base_url}'"
            )));
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("gemchat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LlmError::Configuration(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.to_string(),
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full streaming endpoint URL for `model`.
    fn stream_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{model}:streamGenerateContent?alt=sse",
            self.base_url
        )
    }

    /// History followed by the new user message.
    fn to_gemini_request(request: &ChatRequest) -> GenerateContentRequest {
        let mut contents = request.history.clone();
        contents.push(HistoryEntry::text(ModelRole::User, request.message.clone()));
        GenerateContentRequest { contents }
    }
}

/// Model ids are interpolated into the URL path, so only
/// `[A-Za-z0-9._-]` is accepted.
pub fn validate_model_id(model: &str) -> Result<(), LlmError> {
    let valid = !model.is_empty()
        && model
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(LlmError::Configuration(format!("invalid model id '{model}'")))
    }
}

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn stream(&self, request: ChatRequest) -> EventStream {
        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };
        let body = Self::to_gemini_request(&request);
        let url = self.stream_url(&model);

        create_gemini_stream(&self.client, &url, body, &self.api_key)
    }
}
