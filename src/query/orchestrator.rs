//! Query orchestration
//!
//! `QueryOrchestrator` drives one streaming exchange end to end: it validates
//! the request, hands a raw-text sink to the transport, parses every line as
//! it arrives and dispatches the resulting events in order.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::response::{FailureKind, QueryResponse};
use super::state::{Lifecycle, QueryState};
use crate::audio::AudioAggregator;
use crate::config::{ClientConfig, FailureTiming, OrchestratorOptions};
use crate::error::{DifyError, DifyResult, TransportError};
use crate::models::QueryRequest;
use crate::sse::{EventKind, LineBuffer, LineParser, ParsedLine, StreamEvent};
use crate::traits::{ResponseProcessor, StreamingTransport};

/// Caller hook invoked with every dispatched event, in arrival order.
pub type EventCallback<'a> = dyn FnMut(&StreamEvent) + Send + 'a;

const INVALID_REQUEST_MESSAGE: &str = "Invalid request: query and user are required";
const UNKNOWN_TRANSPORT_ERROR: &str = "Unknown transport error";

/// Owns the lifecycle of streaming queries against one transport.
///
/// Holds no per-query state; concurrent `execute` calls are independent.
pub struct QueryOrchestrator {
    transport: Arc<dyn StreamingTransport>,
    processor: Arc<dyn ResponseProcessor>,
    parser: LineParser,
    failure_timing: FailureTiming,
}

impl QueryOrchestrator {
    pub fn new(
        transport: Arc<dyn StreamingTransport>,
        processor: Arc<dyn ResponseProcessor>,
    ) -> Self {
        Self::with_options(transport, processor, OrchestratorOptions::default())
    }

    pub fn with_options(
        transport: Arc<dyn StreamingTransport>,
        processor: Arc<dyn ResponseProcessor>,
        options: OrchestratorOptions,
    ) -> Self {
        Self {
            transport,
            processor,
            parser: LineParser::with_options(options.parser),
            failure_timing: options.failure_timing,
        }
    }

    /// Run one query.
    ///
    /// Returns `Err` for a missing request (`InvalidArgument`) and for
    /// cancellation (`Cancelled`). A blank request or a transport failure is
    /// reported as an unsuccessful `QueryResponse`.
    pub async fn execute(
        &self,
        request: Option<&QueryRequest>,
        on_event: Option<&mut EventCallback<'_>>,
        cancel: &CancellationToken,
    ) -> DifyResult<QueryResponse> {
        let request = request
            .ok_or_else(|| DifyError::invalid_argument("request", "Request cannot be null"))?;

        let mut lifecycle = Lifecycle::new();
        if cancel.is_cancelled() {
            lifecycle.advance(QueryState::Cancelled);
            return Err(DifyError::Cancelled);
        }

        lifecycle.advance(QueryState::Validating);
        if !request.is_valid() {
            warn!("Rejecting invalid request");
            lifecycle.advance(QueryState::Failed);
            return Ok(QueryResponse::failure(
                FailureKind::InvalidRequest,
                INVALID_REQUEST_MESSAGE,
                Duration::ZERO,
            ));
        }

        lifecycle.advance(QueryState::Streaming);
        let started = Instant::now();
        let audio_enabled = self.transport.configuration().enable_audio_processing;
        let mut dispatch = Dispatch {
            parser: &self.parser,
            processor: self.processor.as_ref(),
            on_event,
            cancel,
            audio_enabled,
            buffer: LineBuffer::new(),
            state: StreamAccumulator::default(),
        };

        let result = {
            let mut sink = |chunk: &str| dispatch.feed(chunk);
            self.transport.send_streaming(request, &mut sink, cancel).await
        };
        dispatch.finish();
        let elapsed = started.elapsed();
        let acc = dispatch.state;

        if cancel.is_cancelled() || matches!(result, Err(TransportError::Cancelled)) {
            info!("Query cancelled after {} events", acc.event_count);
            lifecycle.advance(QueryState::Cancelled);
            return Err(DifyError::Cancelled);
        }

        match result {
            Ok(outcome) if outcome.success => {
                lifecycle.advance(QueryState::Completed);
                info!(
                    "Query completed: {} events, {} audio chunks in {:?}",
                    acc.event_count,
                    acc.audio.len(),
                    elapsed
                );
                Ok(QueryResponse::success(
                    acc.text.trim(),
                    acc.conversation_id,
                    acc.message_id,
                    elapsed,
                )
                .with_audio_chunks(acc.audio.into_chunks())
                .with_event_count(acc.event_count)
                .with_parse_error_count(acc.parse_errors))
            }
            Ok(outcome) => {
                let message = outcome
                    .error_text
                    .unwrap_or_else(|| UNKNOWN_TRANSPORT_ERROR.to_string());
                warn!("Transport reported failure: {}", message);
                lifecycle.advance(QueryState::Failed);
                Ok(QueryResponse::failure(FailureKind::Transport, message, elapsed)
                    .with_event_count(acc.event_count)
                    .with_parse_error_count(acc.parse_errors))
            }
            Err(e) => {
                warn!("Transport error: {}", e);
                lifecycle.advance(QueryState::Failed);
                let elapsed = match self.failure_timing {
                    FailureTiming::Zero => Duration::ZERO,
                    FailureTiming::Measured => elapsed,
                };
                Ok(QueryResponse::failure(FailureKind::Transport, e.to_string(), elapsed)
                    .with_event_count(acc.event_count)
                    .with_parse_error_count(acc.parse_errors))
            }
        }
    }

    /// The transport's configuration.
    pub fn configuration(&self) -> ClientConfig {
        self.transport.configuration()
    }

    /// Check that the backend is reachable.
    pub async fn test_connection(&self, cancel: &CancellationToken) -> bool {
        self.transport.test_connection(cancel).await
    }
}

/// Per-query accumulators.
#[derive(Debug, Default)]
struct StreamAccumulator {
    text: String,
    conversation_id: String,
    message_id: String,
    audio: AudioAggregator,
    event_count: usize,
    parse_errors: usize,
    ended: bool,
}

/// Line splitting, parsing and event routing for one query.
struct Dispatch<'a, 'cb> {
    parser: &'a LineParser,
    processor: &'a dyn ResponseProcessor,
    on_event: Option<&'a mut EventCallback<'cb>>,
    cancel: &'a CancellationToken,
    audio_enabled: bool,
    buffer: LineBuffer,
    state: StreamAccumulator,
}

impl Dispatch<'_, '_> {
    fn stopped(&self) -> bool {
        self.state.ended || self.cancel.is_cancelled()
    }

    fn feed(&mut self, chunk: &str) {
        if self.stopped() {
            return;
        }
        for line in self.buffer.push_str(chunk) {
            self.handle_line(&line);
            if self.stopped() {
                break;
            }
        }
    }

    fn finish(&mut self) {
        if let Some(tail) = self.buffer.finish() {
            self.handle_line(&tail);
        }
    }

    fn handle_line(&mut self, line: &str) {
        if self.stopped() {
            return;
        }
        match self.parser.parse_line(line) {
            ParsedLine::EndMarker => {
                debug!("End marker received");
                self.state.ended = true;
            }
            ParsedLine::Valid(Some(event)) => self.dispatch(event),
            ParsedLine::ParseError { message, .. } => {
                self.state.parse_errors += 1;
                warn!("Skipping unparseable line: {}", message);
            }
            ParsedLine::Valid(None) | ParsedLine::Skipped => {}
        }
    }

    fn dispatch(&mut self, event: StreamEvent) {
        let acc = &mut self.state;
        acc.event_count += 1;
        acc.conversation_id = event.conversation_id().to_string();
        if let Some(id) = event.message_id() {
            acc.message_id = id.to_string();
        }

        match event.kind() {
            EventKind::Audio if self.audio_enabled => {
                if let Some(payload) = event.audio_payload() {
                    // Failures are logged by the aggregator; the event is still forwarded
                    let _ = acc.audio.push_base64(payload);
                }
                self.processor.process_audio(&event);
            }
            EventKind::Message => {
                if let Some(answer) = event.answer() {
                    acc.text.push_str(answer);
                }
                self.processor.process_text(&event);
            }
            EventKind::Error => {
                warn!(
                    "Backend error event: {}",
                    event.error_message().unwrap_or("no message")
                );
            }
            _ => {}
        }

        if let Some(callback) = self.on_event.as_deref_mut() {
            callback(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{RecordedCall, RecordingProcessor, ScriptedTransport};

    const STREAM: &str = concat!(
        "data: {\"event\":\"message\",\"answer\":\"Hello\",\"conversation_id\":\"c1\",\"message_id\":\"m1\"}\n",
        "data: {\"event\":\"tts_message\",\"audio\":\"SGVs\",\"conversation_id\":\"c1\",\"message_id\":\"m1\"}\n",
        "data: {\"event\":\"message\",\"answer\":\" world \",\"conversation_id\":\"c1\",\"message_id\":\"m1\"}\n",
        "data: {\"event\":\"message_end\",\"conversation_id\":\"c1\",\"message_id\":\"m1\"}\n",
        "data: [DONE]\n",
        "data: {\"event\":\"message\",\"answer\":\"late\",\"conversation_id\":\"c1\",\"message_id\":\"m1\"}\n",
    );

    fn orchestrator(
        transport: ScriptedTransport,
    ) -> (QueryOrchestrator, Arc<ScriptedTransport>, Arc<RecordingProcessor>) {
        let transport = Arc::new(transport);
        let processor = Arc::new(RecordingProcessor::new());
        let orchestrator = QueryOrchestrator::new(transport.clone(), processor.clone());
        (orchestrator, transport, processor)
    }

    fn request() -> QueryRequest {
        QueryRequest::new("hi", "viewer-1", "").unwrap()
    }

    #[tokio::test]
    async fn test_success_aggregates_text_audio_and_ids() {
        let (orchestrator, _, processor) = orchestrator(ScriptedTransport::with_chunks([STREAM]));
        let mut seen = Vec::new();
        let mut callback = |event: &StreamEvent| seen.push(event.kind());

        let response = orchestrator
            .execute(Some(&request()), Some(&mut callback), &CancellationToken::new())
            .await
            .unwrap();

        assert!(response.is_success());
        assert_eq!(response.text(), "Hello world");
        assert_eq!(response.conversation_id(), "c1");
        assert_eq!(response.message_id(), "m1");
        assert_eq!(response.audio_chunks().len(), 1);
        assert_eq!(response.event_count(), 4);
        assert_eq!(
            seen,
            vec![
                EventKind::Message,
                EventKind::Audio,
                EventKind::Message,
                EventKind::End
            ]
        );
        assert_eq!(
            processor.calls(),
            vec![
                RecordedCall::Text("Hello".to_string()),
                RecordedCall::Audio("SGVs".to_string()),
                RecordedCall::Text(" world ".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_lines_split_across_chunks() {
        let (first, second) = STREAM.split_at(37);
        let (orchestrator, _, _) = orchestrator(ScriptedTransport::with_chunks([first, second]));
        let response = orchestrator
            .execute(Some(&request()), None, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(response.text(), "Hello world");
    }

    #[tokio::test]
    async fn test_missing_request_is_invalid_argument() {
        let (orchestrator, transport, _) = orchestrator(ScriptedTransport::with_chunks([STREAM]));
        let err = orchestrator
            .execute(None, None, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DifyError::InvalidArgument { argument: "request", .. }));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_request_fails_without_network() {
        let (orchestrator, transport, _) = orchestrator(ScriptedTransport::with_chunks([STREAM]));
        let blank: QueryRequest = serde_json::from_str(r#"{"query":" ","user":"u"}"#).unwrap();
        let response = orchestrator
            .execute(Some(&blank), None, &CancellationToken::new())
            .await
            .unwrap();
        assert!(!response.is_success());
        assert_eq!(response.failure_kind(), Some(FailureKind::InvalidRequest));
        assert_eq!(response.elapsed(), Duration::ZERO);
        assert_eq!(transport.call_count(), 0);

        let err = response.into_result().unwrap_err();
        assert!(matches!(err, DifyError::InvalidRequest { .. }));
        assert_eq!(err.error_code(), "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_pre_cancelled_token_skips_transport() {
        let (orchestrator, transport, _) = orchestrator(ScriptedTransport::with_chunks([STREAM]));
        let token = CancellationToken::new();
        token.cancel();
        let err = orchestrator
            .execute(Some(&request()), None, &token)
            .await
            .unwrap_err();
        assert_eq!(err, DifyError::Cancelled);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unsuccessful_result_is_failure_response() {
        let transport = ScriptedTransport::with_chunks(Vec::<String>::new())
            .failing_with("HTTP 500: upstream down");
        let (orchestrator, _, _) = orchestrator(transport);
        let response = orchestrator
            .execute(Some(&request()), None, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(response.failure_kind(), Some(FailureKind::Transport));
        assert_eq!(response.error_message(), Some("HTTP 500: upstream down"));
    }

    #[tokio::test]
    async fn test_transport_error_reports_zero_elapsed_by_default() {
        let transport = ScriptedTransport::with_chunks(Vec::<String>::new()).erroring_with(
            TransportError::ConnectionFailed {
                url: "http://localhost".to_string(),
                message: "refused".to_string(),
            },
        );
        let (orchestrator, _, _) = orchestrator(transport);
        let response = orchestrator
            .execute(Some(&request()), None, &CancellationToken::new())
            .await
            .unwrap();
        assert!(!response.is_success());
        assert_eq!(response.elapsed(), Duration::ZERO);
        assert!(response.error_message().unwrap().contains("refused"));
    }

    #[tokio::test]
    async fn test_transport_cancelled_error_propagates() {
        let transport = ScriptedTransport::with_chunks(Vec::<String>::new())
            .erroring_with(TransportError::Cancelled);
        let (orchestrator, _, _) = orchestrator(transport);
        let err = orchestrator
            .execute(Some(&request()), None, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn test_parse_errors_are_counted_not_fatal() {
        let body = "data: {oops}\ndata: {\"event\":\"message\",\"answer\":\"ok\",\"conversation_id\":\"c\",\"message_id\":\"m\"}\n";
        let (orchestrator, _, _) = orchestrator(ScriptedTransport::with_chunks([body]));
        let response = orchestrator
            .execute(Some(&request()), None, &CancellationToken::new())
            .await
            .unwrap();
        assert!(response.is_success());
        assert_eq!(response.text(), "ok");
        assert_eq!(response.parse_error_count(), 1);
    }

    #[tokio::test]
    async fn test_unterminated_final_line_is_parsed() {
        let body = "data: {\"event\":\"message\",\"answer\":\"tail\",\"conversation_id\":\"c\",\"message_id\":\"m\"}";
        let (orchestrator, _, _) = orchestrator(ScriptedTransport::with_chunks([body]));
        let response = orchestrator
            .execute(Some(&request()), None, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(response.text(), "tail");
    }

    #[tokio::test]
    async fn test_audio_disabled_skips_aggregation_but_forwards() {
        let config = ClientConfig::new("app-0123456789", "http://localhost/v1")
            .unwrap()
            .with_audio_processing(false);
        let transport = ScriptedTransport::with_chunks([STREAM]).with_config(config);
        let (orchestrator, _, processor) = orchestrator(transport);
        let mut audio_seen = 0;
        let mut callback = |event: &StreamEvent| {
            if event.is_audio() {
                audio_seen += 1;
            }
        };
        let response = orchestrator
            .execute(Some(&request()), Some(&mut callback), &CancellationToken::new())
            .await
            .unwrap();
        assert!(!response.has_audio());
        assert_eq!(audio_seen, 1);
        assert!(processor
            .calls()
            .iter()
            .all(|call| matches!(call, RecordedCall::Text(_))));
    }

    #[tokio::test]
    async fn test_configuration_and_connection_pass_through() {
        let (orchestrator, _, _) = orchestrator(ScriptedTransport::with_chunks([STREAM]));
        assert_eq!(orchestrator.configuration(), ScriptedTransport::default_config());
        assert!(orchestrator.test_connection(&CancellationToken::new()).await);
    }
}
