//! Streaming transport backed by a recorded trace.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ReplayError, TransportError};
use crate::models::QueryRequest;
use crate::traits::{RawLineSink, StreamingTransport, TransportResult};

use super::simulator::ReplaySimulator;
use super::trace::RecordingTrace;

/// Simulated round trip for `test_connection`.
pub const REPLAY_CONNECTION_DELAY: Duration = Duration::from_millis(50);

/// Stands in for the live backend by replaying a recording.
///
/// The request is ignored: every call plays the same trace.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use dify_stream::replay::{RecordingTrace, ReplaySimulator, ReplayTransport};
///
/// let trace = Arc::new(RecordingTrace::load("traces/weather.json")?);
/// let transport = ReplayTransport::new(trace, ReplaySimulator::new(4.0)?, config);
/// ```
#[derive(Debug, Clone)]
pub struct ReplayTransport {
    trace: Arc<RecordingTrace>,
    simulator: ReplaySimulator,
    config: ClientConfig,
}

impl ReplayTransport {
    pub fn new(
        trace: Arc<RecordingTrace>,
        simulator: ReplaySimulator,
        config: ClientConfig,
    ) -> Self {
        Self {
            trace,
            simulator,
            config,
        }
    }

    pub fn trace(&self) -> &Arc<RecordingTrace> {
        &self.trace
    }

    pub fn simulator(&self) -> ReplaySimulator {
        self.simulator
    }
}

#[async_trait]
impl StreamingTransport for ReplayTransport {
    async fn send_streaming(
        &self,
        request: &QueryRequest,
        on_chunk: &mut RawLineSink<'_>,
        cancel: &CancellationToken,
    ) -> Result<TransportResult, TransportError> {
        debug!(
            "Replaying recording for query of {} chars",
            request.query().chars().count()
        );
        match self.simulator.replay(&self.trace, on_chunk, cancel).await {
            Ok(body) => Ok(TransportResult::succeeded(body)),
            Err(ReplayError::Cancelled) => Err(TransportError::Cancelled),
            Err(e) => {
                warn!("Replay failed: {}", e);
                Ok(TransportResult::failed(format!("Replay failed: {}", e), ""))
            }
        }
    }

    async fn test_connection(&self, cancel: &CancellationToken) -> bool {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(REPLAY_CONNECTION_DELAY) => true,
        }
    }

    fn configuration(&self) -> ClientConfig {
        self.config.clone()
    }
}
