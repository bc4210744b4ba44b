//! Client configuration, read from the environment.

use std::path::PathBuf;
use std::time::Duration;

pub const API_URL_VAR: &str = "TRADENEST_API_URL";
pub const SESSION_FILE_VAR: &str = "TRADENEST_SESSION_FILE";
pub const REFRESH_IDLE_VAR: &str = "TRADENEST_REFRESH_IDLE_SECS";
pub const REQUEST_TIMEOUT_VAR: &str = "TRADENEST_REQUEST_TIMEOUT_SECS";

/// Idle countdown before the Session Guard refreshes the token pair.
pub const DEFAULT_REFRESH_AFTER: Duration = Duration::from_secs(20 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL, without trailing slash.
    pub api_base_url: String,
    /// Where the durable session record lives.
    pub session_file: PathBuf,
    pub refresh_after: Duration,
    pub request_timeout: Duration,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a positive number of seconds, got '{value}'")]
    InvalidSeconds { key: &'static str, value: String },
    #[error("{key} must not be empty")]
    Empty { key: &'static str },
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            session_file: PathBuf::from("tradenest-session.json"),
            refresh_after: DEFAULT_REFRESH_AFTER,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(API_URL_VAR) {
            let url = url.trim().trim_end_matches('/');
            if url.is_empty() {
                return Err(ConfigError::Empty { key: API_URL_VAR });
            }
            config.api_base_url = url.to_string();
        }

        if let Some(path) = lookup(SESSION_FILE_VAR) {
            if path.trim().is_empty() {
                return Err(ConfigError::Empty {
                    key: SESSION_FILE_VAR,
                });
            }
            config.session_file = PathBuf::from(path);
        }

        if let Some(value) = lookup(REFRESH_IDLE_VAR) {
            config.refresh_after = parse_seconds(REFRESH_IDLE_VAR, &value)?;
        }

        if let Some(value) = lookup(REQUEST_TIMEOUT_VAR) {
            config.request_timeout = parse_seconds(REQUEST_TIMEOUT_VAR, &value)?;
        }

        Ok(config)
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }

    pub fn with_refresh_after(mut self, idle: Duration) -> Self {
        self.refresh_after = idle;
        self
    }
}

fn parse_seconds(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidSeconds {
            key,
            value: value.to_string(),
        }),
    }
}
