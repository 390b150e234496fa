//! Replay-related error types.
//!
//! Errors raised while loading a recorded trace or replaying it.

use std::fmt;
use std::path::PathBuf;

/// Replay-specific error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplayError {
    /// The trace file does not exist.
    NotFound { path: PathBuf },

    /// The trace could not be parsed.
    InvalidFormat { message: String },

    /// The trace file exists but could not be read.
    Io { path: PathBuf, message: String },

    /// Playback speed must be finite and strictly positive.
    InvalidSpeed { speed: f64 },

    /// Replay was cancelled while waiting for the next event.
    Cancelled,
}

impl ReplayError {
    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            ReplayError::NotFound { path } => {
                format!("Recording not found: {}", path.display())
            }
            ReplayError::InvalidFormat { message } => {
                format!("Recording is not a valid trace: {}", message)
            }
            ReplayError::Io { path, .. } => {
                format!("Could not read recording {}", path.display())
            }
            ReplayError::InvalidSpeed { speed } => {
                format!("Playback speed must be positive (got {})", speed)
            }
            ReplayError::Cancelled => "Replay cancelled".to_string(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ReplayError::NotFound { .. } => "REPLAY_NOT_FOUND",
            ReplayError::InvalidFormat { .. } => "REPLAY_INVALID_FORMAT",
            ReplayError::Io { .. } => "REPLAY_IO",
            ReplayError::InvalidSpeed { .. } => "REPLAY_INVALID_SPEED",
            ReplayError::Cancelled => "REPLAY_CANCELLED",
        }
    }
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayError::NotFound { path } => {
                write!(f, "Trace file not found: {}", path.display())
            }
            ReplayError::InvalidFormat { message } => write!(f, "Invalid trace: {}", message),
            ReplayError::Io { path, message } => {
                write!(f, "Failed to read {}: {}", path.display(), message)
            }
            ReplayError::InvalidSpeed { speed } => write!(f, "Invalid playback speed: {}", speed),
            ReplayError::Cancelled => write!(f, "Replay cancelled"),
        }
    }
}

impl std::error::Error for ReplayError {}
