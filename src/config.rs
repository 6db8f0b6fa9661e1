// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default credential file used by the CLI.
pub const DEFAULT_CREDENTIALS_PATH: &str = "leadr_credentials.json";

/// SDK configuration, constructed once by the host application.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service base URL, e.g. `https://api.example.com`
    pub base_url: String,
    /// Game identifier sent with session bootstrap and list filters
    pub game_id: String,
    /// Log each request/response (header values redacted)
    pub debug_logging: bool,
    /// Per-request transport timeout
    pub timeout: Duration,
    /// Where the CLI keeps its credential file
    pub credentials_path: PathBuf,
}

impl Default for ClientConfig {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            game_id: "test-game".to_string(),
            debug_logging: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, game_id: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            game_id: game_id.into(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let config = Self {
            base_url: env::var("LEADR_BASE_URL")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("LEADR_BASE_URL"))?,
            game_id: env::var("LEADR_GAME_ID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("LEADR_GAME_ID"))?,
            debug_logging: env::var("LEADR_DEBUG_LOGGING")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            timeout: Duration::from_secs(
                env::var("LEADR_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            credentials_path: env::var("LEADR_CREDENTIALS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CREDENTIALS_PATH)),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can be used to build a client.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.game_id.trim().is_empty() {
            return Err(ConfigError::Invalid("game_id must not be empty".to_string()));
        }

        let url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ConfigError::Invalid(format!("base_url '{}': {}", self.base_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "base_url must be http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid("timeout must be non-zero".to_string()));
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
