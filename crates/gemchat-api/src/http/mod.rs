//! HTTP layer for gemchat.
//!
//! Serves the single-page chat UI at `/` and a small JSON + SSE API at
//! `/api/v1/` that the page talks to.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
