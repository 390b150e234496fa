//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`StreamingTransport`] - delivers raw streaming response text
//! - [`ResponseProcessor`] - consumes audio and text events

pub mod processor;
pub mod transport;

pub use processor::ResponseProcessor;
pub use transport::{RawLineSink, StreamingTransport, TransportResult};
