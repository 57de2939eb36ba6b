//! Gemini `generateContent` API types.
//!
//! These are Gemini-specific request/response structures used for HTTP
//! communication. They are NOT the generic LLM types from gemchat-types --
//! those are provider-agnostic.

use serde::{Deserialize, Serialize};

use gemchat_types::llm::HistoryEntry;

/// Finish reasons that mean the candidate was cut off by a content filter.
pub const BLOCKING_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "RECITATION",
    "BLOCKLIST",
    "PROHIBITED_CONTENT",
    "SPII",
];

/// Request body for `streamGenerateContent`.
///
/// `HistoryEntry` already serializes to the `{"role","parts":[{"text"}]}`
/// content shape.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<HistoryEntry>,
}

/// One streamed `GenerateContentResponse` chunk.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
    pub prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, skipping thought parts.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter(|p| !p.thought)
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
    }

    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
    #[serde(default)]
    pub thought: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
    #[serde(default)]
    pub total_token_count: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

/// Google API error envelope: `{"error":{"code":400,"message":"...","status":"..."}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleErrorBody {
    pub error: GoogleError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleError {
    #[serde(default)]
    pub code: u16,
    pub message: String,
    pub status: Option<String>,
}

/// A streamed `data:` payload: either a response chunk or an error.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StreamPayload {
    Error(GoogleErrorBody),
    Chunk(GenerateContentResponse),
}
