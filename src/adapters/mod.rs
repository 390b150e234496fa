//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`HttpTransport`] - streaming transport using reqwest
//! - [`ChannelProcessor`] - processor forwarding events over a tokio channel
//! - [`crate::replay::ReplayTransport`] lives with the replay engine
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::ScriptedTransport`] - predefined chunks and outcome
//! - [`mock::RecordingProcessor`] - records processor calls

pub mod channel_processor;
pub mod http_transport;
pub mod mock;

pub use channel_processor::{ChannelProcessor, ProcessorEvent};
pub use http_transport::{HttpTransport, CONNECTION_TEST_TIMEOUT};
pub use mock::{RecordedCall, RecordingProcessor, ScriptedTransport};
