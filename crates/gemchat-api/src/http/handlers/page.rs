//! Chat page and the settings it renders from.
//!
//! - GET /              - The single-page chat UI
//! - GET /api/v1/config - Page title, selectable models, API key link

use std::time::Instant;

use axum::extract::State;
use axum::response::Html;
use serde::Serialize;

use crate::http::response::ApiResponse;
use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../../../assets/index.html");

/// Where users obtain a Gemini API key.
pub const API_KEY_URL: &str = "https://aistudio.google.com/app/apikey";

/// Settings the sidebar and header are built from.
#[derive(Debug, Serialize)]
pub struct PageConfig {
    pub page_title: String,
    pub models: Vec<String>,
    pub default_model: String,
    pub api_key_url: &'static str,
}

/// GET / - Serve the chat page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /api/v1/config - Settings for the chat page.
pub async fn get_config(State(state): State<AppState>) -> ApiResponse<PageConfig> {
    let start = Instant::now();

    let config = PageConfig {
        page_title: state.config.page_title.clone(),
        models: state.bridge.models().to_vec(),
        default_model: state.default_model().to_string(),
        api_key_url: API_KEY_URL,
    };

    ApiResponse::timed(config, start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemchat_types::config::AppConfig;

    #[tokio::test]
    async fn test_index_contains_sidebar_labels() {
        let Html(page) = index().await;
        assert!(page.contains("Enter your Google Gemini API Key:"));
        assert!(page.contains("Choose a model:"));
        assert!(page.contains("What would you like to ask?"));
    }

    #[tokio::test]
    async fn test_index_sets_robot_favicon() {
        let Html(page) = index().await;
        let icon = page
            .lines()
            .find(|line| line.contains(r#"rel="icon""#))
            .unwrap();
        assert!(icon.contains("🤖"));
    }

    #[tokio::test]
    async fn test_config_lists_models_in_order() {
        let config = AppConfig {
            models: vec!["gemini-2.5-pro".to_string(), "gemini-2.5-flash".to_string()],
            ..AppConfig::default()
        };
        let state = AppState::new(config);

        let resp = get_config(State(state)).await;
        let data = resp.data.unwrap();
        assert_eq!(data.models, vec!["gemini-2.5-pro", "gemini-2.5-flash"]);
        assert_eq!(data.default_model, "gemini-2.5-pro");
        assert_eq!(data.api_key_url, API_KEY_URL);
    }
}
