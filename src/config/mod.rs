//! Configuration types.
//!
//! - [`ClientConfig`] - backend endpoint, credentials and transport tuning
//! - [`OrchestratorOptions`] - parser and failure-timing policy for queries

mod client;
mod options;

pub use client::{
    ClientConfig, ConfigError, ENV_API_KEY, ENV_API_URL, ENV_DEBUG, ENV_ENABLE_AUDIO,
    ENV_RETRY_COUNT, ENV_TIMEOUT_SECS, MAX_RETRY_COUNT, MAX_TIMEOUT_SECS, MIN_API_KEY_LEN,
};
pub use options::{FailureTiming, OrchestratorOptions};
