//! Application state shared by all HTTP handlers.
//!
//! The completion bridge is generic over its provider factory; AppState
//! erases it to `Box<dyn ProviderFactory>` so tests can inject a scripted
//! backend while `serve` uses Gemini.

use std::sync::Arc;

use gemchat_core::chat::bridge::CompletionBridge;
use gemchat_core::chat::session::SessionStore;
use gemchat_core::llm::provider::ProviderFactory;
use gemchat_infra::llm::GeminiProviderFactory;
use gemchat_types::config::AppConfig;

pub type SharedBridge = CompletionBridge<Box<dyn ProviderFactory>>;

#[derive(Clone)]
pub struct AppState {
    pub bridge: Arc<SharedBridge>,
    pub sessions: Arc<SessionStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire the Gemini provider factory from `config`.
    pub fn new(config: AppConfig) -> Self {
        let factory = GeminiProviderFactory::new(config.base_url.clone());
        Self::with_factory(config, Box::new(factory))
    }

    pub fn with_factory(config: AppConfig, factory: Box<dyn ProviderFactory>) -> Self {
        let config = config.normalized();
        let bridge = CompletionBridge::new(factory, config.models.clone());

        Self {
            bridge: Arc::new(bridge),
            sessions: Arc::new(SessionStore::new()),
            config: Arc::new(config),
        }
    }

    /// Model used when a request does not name one.
    pub fn default_model(&self) -> &str {
        self.config
            .models
            .first()
            .map(String::as_str)
            .unwrap_or(gemchat_types::config::DEFAULT_MODEL)
    }
}
