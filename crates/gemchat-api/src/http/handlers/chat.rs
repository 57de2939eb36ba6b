//! SSE streaming chat endpoint.
//!
//! POST /api/v1/sessions/{id}/chat/stream
//!
//! Missing credentials and provider configuration failures are rejected
//! with a 400 envelope before the stream starts, leaving the transcript
//! untouched. Once the stream is open the turn always completes: the user
//! turn and one assistant turn are appended.
//!
//! SSE event types:
//! - `placeholder` - the reply so far, ending in `▌` while streaming: `{ "content": "..." }`
//! - `final` - the finished reply without the cursor: `{ "content": "..." }`
//! - `error` - sending or streaming failed: `{ "message": "An error occurred: ..." }`
//! - `turn` - the assistant turn that was stored: `{ "role": "assistant", "content": "..." }`
//! - `done` - stream complete: `{}`

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use secrecy::SecretString;
use serde::Deserialize;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::{Stream, StreamExt};
use tracing::Instrument;

use gemchat_core::chat::bridge::Placeholder;

use crate::http::error::AppError;
use crate::http::handlers::session::parse_uuid;
use crate::state::AppState;

/// Request body for the streaming chat endpoint.
///
/// Not `Debug`: the API key must never reach a log line.
#[derive(Deserialize)]
pub struct StreamChatRequest {
    /// Gemini API key from the sidebar. Blank means not provided.
    #[serde(default)]
    pub api_key: String,
    /// Model id from the sidebar; defaults to the first configured model.
    #[serde(default)]
    pub model: Option<String>,
    /// The user prompt.
    pub message: String,
}

fn json_event(name: &'static str, data: serde_json::Value) -> Event {
    Event::default().event(name).data(data.to_string())
}

/// Forwards placeholder updates to the SSE response.
struct ChannelPlaceholder {
    tx: UnboundedSender<Event>,
}

impl Placeholder for ChannelPlaceholder {
    fn show(&mut self, content: &str) {
        // The client may have gone away; the turn still completes.
        let _ = self.tx.send(json_event(
            "placeholder",
            serde_json::json!({ "content": content }),
        ));
    }
}

/// POST /api/v1/sessions/{id}/chat/stream - SSE streaming chat.
pub async fn stream_chat(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<StreamChatRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let sid = parse_uuid(&session_id)?;

    let prompt = body.message;
    if prompt.trim().is_empty() {
        return Err(AppError::Validation("message must not be empty".to_string()));
    }

    let model = body
        .model
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| state.default_model().to_string());
    let api_key = SecretString::from(body.api_key);

    let provider = state.bridge.open(&api_key, &model)?;

    // Held for the whole turn so concurrent submits to one session queue up.
    let mut transcript = state.sessions.get_or_create(sid).lock_owned().await;

    let (tx, rx) = mpsc::unbounded_channel();
    let bridge = state.bridge.clone();
    let span = tracing::info_span!(
        "chat",
        gen_ai.operation.name = "chat",
        gen_ai.request.model = %model,
        session_id = %sid,
    );

    tokio::spawn(
        async move {
            let mut placeholder = ChannelPlaceholder { tx: tx.clone() };
            let outcome = bridge
                .run_turn(&mut transcript, &provider, &model, &prompt, &mut placeholder)
                .await;

            if let Some(usage) = &outcome.usage {
                tracing::info!(
                    gen_ai.usage.input_tokens = usage.input_tokens,
                    gen_ai.usage.output_tokens = usage.output_tokens,
                    "chat turn complete"
                );
            }

            let _ = match &outcome.error {
                Some(message) => tx.send(json_event(
                    "error",
                    serde_json::json!({ "message": message }),
                )),
                None => tx.send(json_event(
                    "final",
                    serde_json::json!({ "content": outcome.reply.content }),
                )),
            };
            let _ = tx.send(json_event(
                "turn",
                serde_json::json!({
                    "role": outcome.reply.role,
                    "content": outcome.reply.content,
                }),
            ));
            let _ = tx.send(Event::default().event("done").data("{}"));
        }
        .instrument(span),
    );

    let sse_stream = UnboundedReceiverStream::new(rx).map(Ok::<_, Infallible>);

    Ok(Sse::new(sse_stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))))
}
