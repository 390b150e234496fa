//! Transport-related error types.
//!
//! Errors raised by a `StreamingTransport` implementation while talking to
//! the backend (or to a stand-in for it).

use std::fmt;

/// Transport-specific error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// Connection to the server failed.
    ConnectionFailed { url: String, message: String },

    /// Request timed out.
    Timeout { operation: String, duration_secs: u64 },

    /// Reading the response body failed mid-stream.
    Io { message: String },

    /// The caller cancelled the request.
    Cancelled,

    /// Generic transport error.
    Other { message: String },
}

impl TransportError {
    /// Check if this error is likely transient.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            TransportError::ConnectionFailed { .. }
                | TransportError::Timeout { .. }
                | TransportError::Io { .. }
        )
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            TransportError::ConnectionFailed { url, .. } => {
                format!("Could not connect to {}", url)
            }
            TransportError::Timeout {
                operation,
                duration_secs,
            } => format!("{} timed out after {}s", operation, duration_secs),
            TransportError::Io { .. } => "The response stream was interrupted".to_string(),
            TransportError::Cancelled => "Request cancelled".to_string(),
            TransportError::Other { message } => message.clone(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            TransportError::ConnectionFailed { .. } => "TRANSPORT_CONNECTION",
            TransportError::Timeout { .. } => "TRANSPORT_TIMEOUT",
            TransportError::Io { .. } => "TRANSPORT_IO",
            TransportError::Cancelled => "TRANSPORT_CANCELLED",
            TransportError::Other { .. } => "TRANSPORT_OTHER",
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::ConnectionFailed { url, message } => {
                write!(f, "Connection to {} failed: {}", url, message)
            }
            TransportError::Timeout {
                operation,
                duration_secs,
            } => write!(f, "{} timed out after {}s", operation, duration_secs),
            TransportError::Io { message } => write!(f, "Stream read error: {}", message),
            TransportError::Cancelled => write!(f, "Request cancelled"),
            TransportError::Other { message } => write!(f, "Transport error: {}", message),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|u| u.to_string()).unwrap_or_default();
        if err.is_timeout() {
            TransportError::Timeout {
                operation: "HTTP request".to_string(),
                duration_secs: 0,
            }
        } else if err.is_connect() {
            TransportError::ConnectionFailed {
                url,
                message: err.to_string(),
            }
        } else if err.is_body() || err.is_decode() {
            TransportError::Io {
                message: err.to_string(),
            }
        } else {
            TransportError::Other {
                message: err.to_string(),
            }
        }
    }
}
