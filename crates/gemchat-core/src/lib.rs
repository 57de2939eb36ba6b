//! Business logic for gemchat.
//!
//! Holds the session transcript store, the turn renderer, the provider
//! abstraction, and the completion bridge that drives one chat turn. Depends
//! only on `gemchat-types` -- never on `gemchat-infra` or any HTTP crate.

pub mod chat;
pub mod llm;
