//! Application configuration types for gemchat.
//!
//! `AppConfig` represents the optional `config.toml` that controls the bind
//! address, the models offered in the sidebar, and the API base URL.

use serde::{Deserialize, Serialize};

/// Model offered when no list is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Top-level configuration. All fields have sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Models offered in the sidebar selector, first one preselected.
    #[serde(default = "default_models")]
    pub models: Vec<String>,

    /// Base URL of the generative language API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Browser tab title.
    #[serde(default = "default_page_title")]
    pub page_title: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_models() -> Vec<String> {
    vec![DEFAULT_MODEL.to_string()]
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_page_title() -> String {
    "Gemini Chatbot".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            models: default_models(),
            base_url: default_base_url(),
            page_title: default_page_title(),
        }
    }
}

impl AppConfig {
    /// Replace an empty model list with the default one.
    pub fn normalized(mut self) -> Self {
        self.models.retain(|m| !m.trim().is_empty());
        if self.models.is_empty() {
            self.models = default_models();
        }
        self
    }
}
