//! Streaming transport trait abstraction.
//!
//! A transport delivers the raw text of a streaming response chunk by chunk.
//! Parsing belongs to the orchestrator, so live HTTP and recorded replay are
//! interchangeable behind this trait.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::models::QueryRequest;

/// Receives raw stream text as it arrives.
///
/// Chunks carry no alignment guarantee: a call may hold several lines, part
/// of a line, or a line without its terminator.
pub type RawLineSink<'a> = dyn FnMut(&str) + Send + 'a;

/// Outcome of a completed streaming exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportResult {
    /// The backend accepted the request and the stream ran to completion
    pub success: bool,
    /// Backend-provided failure text when `success` is false
    pub error_text: Option<String>,
    /// Everything delivered to the sink, concatenated
    pub full_body: String,
}

impl TransportResult {
    pub fn succeeded(full_body: impl Into<String>) -> Self {
        Self {
            success: true,
            error_text: None,
            full_body: full_body.into(),
        }
    }

    pub fn failed(error_text: impl Into<String>, full_body: impl Into<String>) -> Self {
        Self {
            success: false,
            error_text: Some(error_text.into()),
            full_body: full_body.into(),
        }
    }
}

/// Trait for streaming backends.
///
/// # Example
///
/// ```ignore
/// use dify_stream::traits::StreamingTransport;
///
/// async fn dump<T: StreamingTransport>(t: &T, request: &QueryRequest) {
///     let token = CancellationToken::new();
///     let mut sink = |chunk: &str| print!("{}", chunk);
///     let _ = t.send_streaming(request, &mut sink, &token).await;
/// }
/// ```
#[async_trait]
pub trait StreamingTransport: Send + Sync {
    /// Send `request` and feed the response text to `on_chunk` as it arrives.
    ///
    /// Returns `Err(TransportError::Cancelled)` when `cancel` fires before
    /// completion. A backend that answers with an error status yields
    /// `Ok` with `success == false`.
    async fn send_streaming(
        &self,
        request: &QueryRequest,
        on_chunk: &mut RawLineSink<'_>,
        cancel: &CancellationToken,
    ) -> Result<TransportResult, TransportError>;

    /// Check that the backend is reachable.
    async fn test_connection(&self, cancel: &CancellationToken) -> bool;

    /// The configuration this transport was built with.
    fn configuration(&self) -> ClientConfig;
}
