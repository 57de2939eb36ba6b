//! Configuration loader for gemchat.
//!
//! Reads `config.toml` from the data directory (`~/.gemchat/` by default)
//! and deserializes it into [`AppConfig`]. The default location is optional:
//! a missing or malformed file falls back to defaults. A path given
//! explicitly on the command line must exist and parse.

use std::path::{Path, PathBuf};

use gemchat_types::config::AppConfig;
use gemchat_types::error::ConfigError;

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `GEMCHAT_HOME` environment variable
/// 2. `~/.gemchat`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("GEMCHAT_HOME") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".gemchat");
    }

    PathBuf::from(".gemchat")
}

/// Default config file location.
pub fn default_config_path() -> PathBuf {
    resolve_data_dir().join("config.toml")
}

/// Load configuration from `path`, falling back to defaults.
///
/// - Missing file: [`AppConfig::default()`].
/// - Unreadable or unparsable file: logs a warning and returns the default.
pub async fn load_config(path: &Path) -> AppConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config.normalized(),
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            AppConfig::default()
        }
    }
}

/// Load configuration from an explicitly requested `path`.
pub async fn load_config_strict(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    toml::from_str::<AppConfig>(&content)
        .map(AppConfig::normalized)
        .map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
}
