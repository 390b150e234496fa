//! Stream-related error types.
//!
//! Errors raised while building stream events or interpreting SSE lines.

use std::fmt;

/// Stream-specific error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamError {
    /// An event factory rejected a blank required field.
    InvalidEvent {
        field: &'static str,
        message: String,
    },

    /// A single SSE line could not be interpreted.
    ParseError {
        message: String,
        raw: String,
    },
}

impl StreamError {
    /// Shorthand for a blank-field rejection.
    pub fn blank(field: &'static str) -> Self {
        StreamError::InvalidEvent {
            field,
            message: format!("{} cannot be empty", field),
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::InvalidEvent { message, .. } => {
                format!("Invalid stream event: {}", message)
            }
            StreamError::ParseError { message, .. } => {
                format!("Could not read part of the response: {}", message)
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::InvalidEvent { .. } => "STREAM_INVALID_EVENT",
            StreamError::ParseError { .. } => "STREAM_PARSE",
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::InvalidEvent { field, message } => {
                write!(f, "Invalid event field '{}': {}", field, message)
            }
            StreamError::ParseError { message, raw } => {
                write!(f, "SSE parse error: {} (raw: {})", message, raw)
            }
        }
    }
}

impl std::error::Error for StreamError {}
