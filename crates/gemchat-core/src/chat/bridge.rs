//! Completion bridge: runs one user turn against the model.
//!
//! A turn goes through three stages:
//! 1. [`CompletionBridge::open`] validates the credential and builds the
//!    provider. Errors here leave the transcript untouched.
//! 2. [`CompletionBridge::run_turn`] appends the user turn, seeds the chat
//!    with every earlier turn and streams the reply into a [`Placeholder`].
//! 3. The assistant turn is appended: the full reply on success, or
//!    [`FALLBACK_REPLY`] if sending or streaming failed.
//!
//! Text already shown in the placeholder before a failure is not stored.

use futures_util::StreamExt;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use gemchat_types::chat::{ChatTurn, FALLBACK_REPLY};
use gemchat_types::error::ChatError;
use gemchat_types::llm::{ChatRequest, HistoryEntry, LlmError, StreamEvent, Usage};

use super::transcript::Transcript;
use crate::llm::provider::{BoxLlmProvider, ProviderFactory};

/// Appended to the running buffer while the reply is still streaming.
pub const CURSOR: &str = "▌";

/// Live-updating assistant bubble.
///
/// Receives the whole reply so far on every update, not just the new
/// fragment.
pub trait Placeholder: Send {
    fn show(&mut self, content: &str);
}

/// Result of a completed turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The assistant turn that was appended to the transcript.
    pub reply: ChatTurn,
    /// User-visible message when sending or streaming failed.
    pub error: Option<String>,
    pub usage: Option<Usage>,
}

impl TurnOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Map prior turns into model history, `assistant` becoming `model`.
pub fn history_from_turns(turns: &[ChatTurn]) -> Vec<HistoryEntry> {
    turns.iter().map(HistoryEntry::from).collect()
}

/// Build the request for `message` with `prior` turns as chat history.
pub fn build_request(model: &str, prior: &[ChatTurn], message: &str) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        history: history_from_turns(prior),
        message: message.to_string(),
    }
}

/// Consume the provider stream, republishing the growing reply.
///
/// Empty fragments are skipped. On success the final text is shown once
/// more without the cursor.
pub async fn stream_reply<P: Placeholder + ?Sized>(
    provider: &BoxLlmProvider,
    request: ChatRequest,
    placeholder: &mut P,
) -> Result<(String, Option<Usage>), LlmError> {
    let mut stream = provider.stream(request);
    let mut full_response = String::new();
    let mut usage = None;

    while let Some(event) = stream.next().await {
        match event? {
            StreamEvent::TextDelta { text } => {
                if text.is_empty() {
                    continue;
                }
                full_response.push_str(&text);
                placeholder.show(&format!("{full_response}{CURSOR}"));
            }
            StreamEvent::Usage(u) => usage = Some(u),
            StreamEvent::Finished { reason } => {
                debug!(reason = %reason, "candidate finished");
            }
            StreamEvent::Done => break,
        }
    }

    placeholder.show(&full_response);
    Ok((full_response, usage))
}

/// Drives chat turns through providers built by `F`.
pub struct CompletionBridge<F: ProviderFactory> {
    factory: F,
    models: Vec<String>,
}

impl<F: ProviderFactory> CompletionBridge<F> {
    /// `models` is the list offered to the user; other ids are rejected.
    pub fn new(factory: F, models: Vec<String>) -> Self {
        Self { factory, models }
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Validate the credential and build a provider for `model`.
    ///
    /// Performs no network I/O.
    pub fn open(&self, api_key: &SecretString, model: &str) -> Result<BoxLlmProvider, ChatError> {
        if api_key.expose_secret().trim().is_empty() {
            return Err(ChatError::MissingApiKey);
        }
        if !self.models.iter().any(|m| m == model) {
            return Err(ChatError::Configuration(format!(
                "model '{model}' is not available"
            )));
        }
        let key = SecretString::from(api_key.expose_secret().trim().to_string());
        Ok(self.factory.create(key, model)?)
    }

    /// Append `prompt`, stream the reply and append the assistant turn.
    ///
    /// Always adds exactly two turns.
    pub async fn run_turn<P: Placeholder + ?Sized>(
        &self,
        transcript: &mut Transcript,
        provider: &BoxLlmProvider,
        model: &str,
        prompt: &str,
        placeholder: &mut P,
    ) -> TurnOutcome {
        transcript.append(ChatTurn::user(prompt));

        let prior = &transcript.all()[..transcript.len() - 1];
        let request = build_request(model, prior, prompt);
        debug!(
            provider = provider.name(),
            model,
            history_len = request.history.len(),
            "sending chat turn"
        );

        let outcome = match stream_reply(provider, request, placeholder).await {
            Ok((text, usage)) => TurnOutcome {
                reply: ChatTurn::assistant(text),
                error: None,
                usage,
            },
            Err(e) => {
                warn!(provider = provider.name(), error = %e, "chat turn failed");
                TurnOutcome {
                    reply: ChatTurn::assistant(FALLBACK_REPLY),
                    error: Some(format!("An error occurred: {e}")),
                    usage: None,
                }
            }
        };

        transcript.append(outcome.reply.clone());
        outcome
    }

    /// [`open`](Self::open) followed by [`run_turn`](Self::run_turn).
    pub async fn submit<P: Placeholder + ?Sized>(
        &self,
        transcript: &mut Transcript,
        api_key: &SecretString,
        model: &str,
        prompt: &str,
        placeholder: &mut P,
    ) -> Result<TurnOutcome, ChatError> {
        let provider = self.open(api_key, model)?;
        Ok(self
            .run_turn(transcript, &provider, model, prompt, placeholder)
            .await)
    }
}
