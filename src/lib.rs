//! Dify Stream - streaming client core for conversational LLM workflows
//!
//! Sends one user utterance to a workflow backend and surfaces the mixed
//! stream of text and audio fragments as it arrives.
//!
//! - [`sse`] - SSE line parsing and stream translation
//! - [`audio`] - base64 audio decoding and aggregation
//! - [`query`] - cancellable query orchestration
//! - [`replay`] - timing-faithful playback of recorded streams
//! - [`adapters`] - HTTP transport, channel processor and test doubles

pub mod adapters;
pub mod audio;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod query;
pub mod replay;
pub mod sse;
pub mod traits;

pub use config::{ClientConfig, FailureTiming, OrchestratorOptions};
pub use error::{DifyError, DifyResult};
pub use models::QueryRequest;
pub use query::{QueryOrchestrator, QueryResponse};
pub use sse::{parse_line, ParsedLine, StreamEvent};
