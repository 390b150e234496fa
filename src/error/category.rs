//! Error category classification for unified error handling.
//!
//! Categories let callers decide how to react to a failure without matching
//! on every concrete variant: surface it, fix the input, or give up.

use std::fmt;

/// High-level categorization of errors for handling decisions.
///
/// This layer never retries. `is_transient` is a hint for the application
/// layer, which owns any retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Caller bug: a required argument was missing or blank.
    Client,

    /// The request was well-formed Rust but semantically invalid
    /// (blank query, blank user).
    User,

    /// Connection, timeout or other transport-level trouble.
    Network,

    /// The backend answered, but with an error status.
    Server,

    /// Malformed protocol data (SSE lines, traces, audio payloads).
    Data,

    /// Filesystem or OS trouble (trace files).
    System,

    /// Missing or invalid client configuration.
    Configuration,

    /// The operation was cancelled cooperatively.
    Cancelled,
}

impl ErrorCategory {
    /// Returns true if errors in this category are usually transient.
    pub fn is_transient(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Client => "client",
            ErrorCategory::User => "user",
            ErrorCategory::Network => "network",
            ErrorCategory::Server => "server",
            ErrorCategory::Data => "data",
            ErrorCategory::System => "system",
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::Cancelled => "cancelled",
        }
    }

    /// Returns a user-friendly description of the category.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCategory::Client => "Application error",
            ErrorCategory::User => "Invalid request",
            ErrorCategory::Network => "Network connectivity issue",
            ErrorCategory::Server => "Server-side issue",
            ErrorCategory::Data => "Malformed data",
            ErrorCategory::System => "System error",
            ErrorCategory::Configuration => "Configuration problem",
            ErrorCategory::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
