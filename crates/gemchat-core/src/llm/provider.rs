//! LlmProvider and ProviderFactory trait definitions.
//!
//! `stream` returns `Pin<Box<dyn Stream>>` so providers stay object-safe and
//! can be selected at runtime behind [`BoxLlmProvider`].

use std::pin::Pin;

use futures_util::Stream;
use secrecy::SecretString;

use gemchat_types::llm::{ChatRequest, LlmError, StreamEvent};

/// Boxed stream of reply events.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>;

/// Type-erased provider for runtime selection.
pub type BoxLlmProvider = Box<dyn LlmProvider>;

/// Trait for streaming chat backends.
///
/// Implementations live in gemchat-infra (e.g., `GeminiProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Open a chat seeded with `request.history`, send `request.message`
    /// and stream the reply.
    ///
    /// Connection and HTTP errors surface as the first stream item, so the
    /// caller handles every send/stream failure in one place.
    fn stream(&self, request: ChatRequest) -> EventStream;
}

/// Builds a provider from a user-supplied credential and model id.
///
/// Construction must not touch the network; failures here abort the turn
/// before anything is added to the transcript.
pub trait ProviderFactory: Send + Sync {
    fn create(&self, api_key: SecretString, model: &str) -> Result<BoxLlmProvider, LlmError>;
}

/// Lets callers pick the factory at runtime (`Box<dyn ProviderFactory>`).
impl<T: ProviderFactory + ?Sized> ProviderFactory for Box<T> {
    fn create(&self, api_key: SecretString, model: &str) -> Result<BoxLlmProvider, LlmError> {
        (**self).create(api_key, model)
    }
}
