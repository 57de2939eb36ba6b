//! Session HTTP handlers.
//!
//! Endpoints:
//! - POST /api/v1/sessions            - Start a new chat session
//! - GET  /api/v1/sessions/{id}/turns - Rendered transcript for a session

use std::time::Instant;

use axum::extract::{Path, State};
use serde::Serialize;
use uuid::Uuid;

use gemchat_core::chat::render::{render_transcript, RenderedTurn};

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreatedSession {
    pub session_id: String,
}

pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid UUID: {s}")))
}

/// POST /api/v1/sessions - Create an empty transcript.
pub async fn create_session(State(state): State<AppState>) -> ApiResponse<CreatedSession> {
    let start = Instant::now();
    let id = state.sessions.create();

    ApiResponse::timed(
        CreatedSession {
            session_id: id.to_string(),
        },
        start,
    )
}

/// GET /api/v1/sessions/{id}/turns - Render every turn, oldest first.
///
/// Unknown sessions render as an empty transcript.
pub async fn get_turns(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<ApiResponse<Vec<RenderedTurn>>, AppError> {
    let start = Instant::now();
    let sid = parse_uuid(&session_id)?;

    let turns = match state.sessions.get(&sid) {
        Some(handle) => {
            let transcript = handle.lock().await;
            render_transcript(transcript.all())
        }
        None => Vec::new(),
    };

    Ok(ApiResponse::timed(turns, start))
}
