//! Mock implementations for testing.
//!
//! # Available Mocks
//!
//! - [`ScriptedTransport`] - transport delivering predefined chunks
//! - [`RecordingProcessor`] - processor recording every call

pub mod processor;
pub mod transport;

pub use processor::{RecordedCall, RecordingProcessor};
pub use transport::ScriptedTransport;
