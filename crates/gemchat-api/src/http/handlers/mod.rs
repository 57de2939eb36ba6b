//! HTTP request handlers.

pub mod chat;
pub mod page;
pub mod session;
