//! Unified error type for the streaming client.
//!
//! `DifyError` wraps every domain error so callers can handle failures through
//! a single type while still reaching the concrete variant when needed.

use std::fmt;

use super::category::ErrorCategory;
use super::replay::ReplayError;
use super::stream::StreamError;
use super::transport::TransportError;
use crate::audio::AudioError;
use crate::config::ConfigError;

/// Unified error type for the streaming client.
#[derive(Debug, Clone, PartialEq)]
pub enum DifyError {
    /// A required argument was missing or blank. Always a caller bug.
    InvalidArgument {
        argument: &'static str,
        message: String,
    },

    /// The domain request is semantically invalid (blank query or user).
    InvalidRequest { message: String },

    /// Event construction or SSE interpretation failed.
    Stream(StreamError),

    /// Backend or network failure.
    Transport(TransportError),

    /// Trace loading or replay failure.
    Replay(ReplayError),

    /// Audio payload failure.
    Audio(AudioError),

    /// Invalid client configuration.
    Config(ConfigError),

    /// Cooperative cancellation was requested.
    Cancelled,
}

impl DifyError {
    /// Shorthand for an `InvalidArgument` error.
    pub fn invalid_argument(argument: &'static str, message: impl Into<String>) -> Self {
        DifyError::InvalidArgument {
            argument,
            message: message.into(),
        }
    }

    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            DifyError::InvalidArgument { .. } => ErrorCategory::Client,
            DifyError::InvalidRequest { .. } => ErrorCategory::User,
            DifyError::Stream(err) => match err {
                StreamError::InvalidEvent { .. } => ErrorCategory::Client,
                StreamError::ParseError { .. } => ErrorCategory::Data,
            },
            DifyError::Transport(err) => match err {
                TransportError::Cancelled => ErrorCategory::Cancelled,
                TransportError::Other { .. } => ErrorCategory::Server,
                _ => ErrorCategory::Network,
            },
            DifyError::Replay(err) => match err {
                ReplayError::NotFound { .. } | ReplayError::Io { .. } => ErrorCategory::System,
                ReplayError::InvalidFormat { .. } => ErrorCategory::Data,
                ReplayError::InvalidSpeed { .. } => ErrorCategory::Client,
                ReplayError::Cancelled => ErrorCategory::Cancelled,
            },
            DifyError::Audio(_) => ErrorCategory::Data,
            DifyError::Config(_) => ErrorCategory::Configuration,
            DifyError::Cancelled => ErrorCategory::Cancelled,
        }
    }

    /// True for every flavour of cooperative cancellation.
    pub fn is_cancelled(&self) -> bool {
        self.category() == ErrorCategory::Cancelled
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            DifyError::InvalidArgument { argument, message } => {
                format!("Invalid argument '{}': {}", argument, message)
            }
            DifyError::InvalidRequest { message } => message.clone(),
            DifyError::Stream(err) => err.user_message(),
            DifyError::Transport(err) => err.user_message(),
            DifyError::Replay(err) => err.user_message(),
            DifyError::Audio(err) => err.to_string(),
            DifyError::Config(err) => format!("Configuration problem: {}", err),
            DifyError::Cancelled => "Request cancelled".to_string(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            DifyError::InvalidArgument { .. } => "INVALID_ARGUMENT",
            DifyError::InvalidRequest { .. } => "INVALID_REQUEST",
            DifyError::Stream(err) => err.error_code(),
            DifyError::Transport(err) => err.error_code(),
            DifyError::Replay(err) => err.error_code(),
            DifyError::Audio(_) => "AUDIO",
            DifyError::Config(_) => "CONFIG",
            DifyError::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for DifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DifyError::InvalidArgument { argument, message } => {
                write!(f, "Invalid argument '{}': {}", argument, message)
            }
            DifyError::InvalidRequest { message } => write!(f, "Invalid request: {}", message),
            DifyError::Stream(err) => write!(f, "{}", err),
            DifyError::Transport(err) => write!(f, "{}", err),
            DifyError::Replay(err) => write!(f, "{}", err),
            DifyError::Audio(err) => write!(f, "{}", err),
            DifyError::Config(err) => write!(f, "{}", err),
            DifyError::Cancelled => write!(f, "Operation cancelled"),
        }
    }
}

impl std::error::Error for DifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DifyError::Stream(err) => Some(err),
            DifyError::Transport(err) => Some(err),
            DifyError::Replay(err) => Some(err),
            DifyError::Audio(err) => Some(err),
            DifyError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StreamError> for DifyError {
    fn from(err: StreamError) -> Self {
        DifyError::Stream(err)
    }
}

impl From<TransportError> for DifyError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Cancelled => DifyError::Cancelled,
            other => DifyError::Transport(other),
        }
    }
}

impl From<ReplayError> for DifyError {
    fn from(err: ReplayError) -> Self {
        match err {
            ReplayError::Cancelled => DifyError::Cancelled,
            ReplayError::InvalidSpeed { speed } => DifyError::invalid_argument(
                "speed",
                format!("Playback speed must be finite and positive (got {})", speed),
            ),
            other => DifyError::Replay(other),
        }
    }
}

impl From<AudioError> for DifyError {
    fn from(err: AudioError) -> Self {
        DifyError::Audio(err)
    }
}

impl From<ConfigError> for DifyError {
    fn from(err: ConfigError) -> Self {
        DifyError::Config(err)
    }
}
