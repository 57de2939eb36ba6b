//! Chat session state and turn processing.
//!
//! - `transcript`: append-only ordered list of turns for one session
//! - `session`: registry mapping session ids to transcripts
//! - `render`: projection of a transcript into display blocks
//! - `bridge`: runs one user turn against the model and streams the reply

pub mod bridge;
pub mod render;
pub mod session;
pub mod transcript;
