//! Scripted transport for testing.
//!
//! Delivers a fixed list of raw chunks to the sink and then finishes with a
//! configured outcome, recording every request it receives.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::models::QueryRequest;
use crate::traits::{RawLineSink, StreamingTransport, TransportResult};

#[derive(Debug, Clone)]
enum Outcome {
    Success,
    Failure(String),
    Error(TransportError),
}

/// Transport that replays scripted chunks.
///
/// # Example
///
/// ```ignore
/// use dify_stream::adapters::mock::ScriptedTransport;
///
/// let transport = ScriptedTransport::with_chunks(["data: [DONE]\n"])
///     .failing_with("HTTP 500: upstream down");
/// ```
#[derive(Debug, Clone)]
pub struct ScriptedTransport {
    chunks: Vec<String>,
    outcome: Outcome,
    config: ClientConfig,
    chunk_delay: Option<Duration>,
    cancel_after: Option<usize>,
    reachable: bool,
    requests: Arc<Mutex<Vec<QueryRequest>>>,
}

impl ScriptedTransport {
    pub fn with_chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            chunks: chunks.into_iter().map(Into::into).collect(),
            outcome: Outcome::Success,
            config: Self::default_config(),
            chunk_delay: None,
            cancel_after: None,
            reachable: true,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Configuration reported unless overridden.
    pub fn default_config() -> ClientConfig {
        ClientConfig {
            api_key: "mock-api-key-0000".to_string(),
            api_url: "http://localhost/v1/chat-messages".to_string(),
            enable_audio_processing: true,
            timeout_secs: 30,
            retry_count: 3,
            debug_logging: false,
        }
    }

    /// Finish with an unsuccessful result carrying `error_text`.
    pub fn failing_with(mut self, error_text: impl Into<String>) -> Self {
        self.outcome = Outcome::Failure(error_text.into());
        self
    }

    /// Finish with a transport error.
    pub fn erroring_with(mut self, error: TransportError) -> Self {
        self.outcome = Outcome::Error(error);
        self
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Wait before each chunk.
    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = Some(delay);
        self
    }

    /// Cancel the caller's token once `count` chunks were delivered.
    pub fn cancelling_after(mut self, count: usize) -> Self {
        self.cancel_after = Some(count);
        self
    }

    /// Result of `test_connection`.
    pub fn reachable(mut self, reachable: bool) -> Self {
        self.reachable = reachable;
        self
    }

    fn recorded(&self) -> MutexGuard<'_, Vec<QueryRequest>> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<QueryRequest> {
        self.recorded().clone()
    }

    pub fn call_count(&self) -> usize {
        self.recorded().len()
    }
}

#[async_trait]
impl StreamingTransport for ScriptedTransport {
    async fn send_streaming(
        &self,
        request: &QueryRequest,
        on_chunk: &mut RawLineSink<'_>,
        cancel: &CancellationToken,
    ) -> Result<TransportResult, TransportError> {
        self.recorded().push(request.clone());

        let mut body = String::new();
        for (index, chunk) in self.chunks.iter().enumerate() {
            if let Some(delay) = self.chunk_delay {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(TransportError::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                }
            }
            if cancel.is_cancelled() {
                return Err(TransportError::Cancelled);
            }
            on_chunk(chunk);
            body.push_str(chunk);
            if self.cancel_after == Some(index + 1) {
                cancel.cancel();
            }
        }

        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled);
        }

        match &self.outcome {
            Outcome::Success => Ok(TransportResult::succeeded(body)),
            Outcome::Failure(text) => Ok(TransportResult::failed(text.clone(), body)),
            Outcome::Error(e) => Err(e.clone()),
        }
    }

    async fn test_connection(&self, cancel: &CancellationToken) -> bool {
        self.reachable && !cancel.is_cancelled()
    }

    fn configuration(&self) -> ClientConfig {
        self.config.clone()
    }
}
