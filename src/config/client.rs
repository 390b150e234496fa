//! Client configuration for the workflow backend.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum accepted API key length.
pub const MIN_API_KEY_LEN: usize = 10;
/// Upper bound for the request timeout.
pub const MAX_TIMEOUT_SECS: u64 = 300;
/// Upper bound for the advertised retry count.
pub const MAX_RETRY_COUNT: u32 = 10;

pub const ENV_API_KEY: &str = "DIFY_API_KEY";
pub const ENV_API_URL: &str = "DIFY_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "DIFY_TIMEOUT_SECS";
pub const ENV_RETRY_COUNT: &str = "DIFY_RETRY_COUNT";
pub const ENV_ENABLE_AUDIO: &str = "DIFY_ENABLE_AUDIO";
pub const ENV_DEBUG: &str = "DIFY_DEBUG";

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("API key cannot be empty")]
    MissingApiKey,

    #[error("API key must be at least {min} characters (got {len})")]
    ApiKeyTooShort { len: usize, min: usize },

    #[error("API URL cannot be empty")]
    MissingApiUrl,

    #[error("API URL '{url}' is not a valid absolute http(s) URL: {reason}")]
    InvalidApiUrl { url: String, reason: String },

    #[error("timeout must be between 1 and {max} seconds (got {secs})")]
    TimeoutOutOfRange { secs: u64, max: u64 },

    #[error("retry count must be at most {max} (got {count})")]
    RetryCountOutOfRange { count: u32, max: u32 },

    #[error("environment variable {var} has invalid value '{value}'")]
    InvalidEnvValue { var: &'static str, value: String },
}

/// Connection settings for the streaming backend.
///
/// `retry_count` is carried for the application layer; this crate never
/// retries on its own.
///
/// # Example
///
/// ```ignore
/// use dify_stream::config::ClientConfig;
///
/// let config = ClientConfig::new("app-0123456789", "https://api.dify.ai/v1/chat-messages")?
///     .with_timeout_secs(60)
///     .with_debug_logging(true);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Bearer token sent with every request
    pub api_key: String,
    /// Chat-messages endpoint URL
    pub api_url: String,
    /// Decode and aggregate audio fragments
    #[serde(default = "default_true")]
    pub enable_audio_processing: bool,
    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Retry budget advertised to the application layer
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    /// Verbose logging
    #[serde(default)]
    pub debug_logging: bool,
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3
}

impl ClientConfig {
    /// Create a validated configuration with default tuning values.
    pub fn new(
        api_key: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            api_key: api_key.into().trim().to_string(),
            api_url: api_url.into().trim().to_string(),
            enable_audio_processing: true,
            timeout_secs: default_timeout_secs(),
            retry_count: default_retry_count(),
            debug_logging: false,
        };
        config.validate()?;
        Ok(config)
    }

    /// Set whether audio fragments are decoded and aggregated.
    pub fn with_audio_processing(mut self, enable: bool) -> Self {
        self.enable_audio_processing = enable;
        self
    }

    /// Set the request timeout in seconds.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the advertised retry count.
    pub fn with_retry_count(mut self, count: u32) -> Self {
        self.retry_count = count;
        self
    }

    /// Enable verbose logging.
    pub fn with_debug_logging(mut self, enable: bool) -> Self {
        self.debug_logging = enable;
        self
    }

    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check every field against the accepted ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let key = self.api_key.trim();
        if key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if key.chars().count() < MIN_API_KEY_LEN {
            return Err(ConfigError::ApiKeyTooShort {
                len: key.chars().count(),
                min: MIN_API_KEY_LEN,
            });
        }

        let url = self.api_url.trim();
        if url.is_empty() {
            return Err(ConfigError::MissingApiUrl);
        }
        match reqwest::Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            Ok(parsed) => {
                return Err(ConfigError::InvalidApiUrl {
                    url: url.to_string(),
                    reason: format!("unsupported scheme '{}'", parsed.scheme()),
                })
            }
            Err(e) => {
                return Err(ConfigError::InvalidApiUrl {
                    url: url.to_string(),
                    reason: e.to_string(),
                })
            }
        }

        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::TimeoutOutOfRange {
                secs: self.timeout_secs,
                max: MAX_TIMEOUT_SECS,
            });
        }
        if self.retry_count > MAX_RETRY_COUNT {
            return Err(ConfigError::RetryCountOutOfRange {
                count: self.retry_count,
                max: MAX_RETRY_COUNT,
            });
        }
        Ok(())
    }

    /// Whether `validate` passes.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Build a configuration from `DIFY_*` environment variables.
    ///
    /// `DIFY_API_KEY` and `DIFY_API_URL` are required; the tuning variables
    /// fall back to their defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var(ENV_API_KEY).unwrap_or_default();
        let api_url = std::env::var(ENV_API_URL).unwrap_or_default();

        let mut config = Self {
            api_key: api_key.trim().to_string(),
            api_url: api_url.trim().to_string(),
            enable_audio_processing: true,
            timeout_secs: default_timeout_secs(),
            retry_count: default_retry_count(),
            debug_logging: false,
        };

        if let Some(secs) = read_env_parsed::<u64>(ENV_TIMEOUT_SECS)? {
            config.timeout_secs = secs;
        }
        if let Some(count) = read_env_parsed::<u32>(ENV_RETRY_COUNT)? {
            config.retry_count = count;
        }
        if let Some(enable) = read_env_flag(ENV_ENABLE_AUDIO)? {
            config.enable_audio_processing = enable;
        }
        if let Some(debug) = read_env_flag(ENV_DEBUG)? {
            config.debug_logging = debug;
        }

        config.validate()?;
        Ok(config)
    }
}

fn read_env_parsed<T: std::str::FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnvValue { var, value: raw }),
        _ => Ok(None),
    }
}

fn read_env_flag(var: &'static str) -> Result<Option<bool>, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "" => Ok(None),
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidEnvValue { var, value: raw }),
        },
        Err(_) => Ok(None),
    }
}
