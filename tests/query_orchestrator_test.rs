//! End-to-end orchestration over scripted and replayed transports.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use dify_stream::adapters::mock::{RecordedCall, RecordingProcessor, ScriptedTransport};
use dify_stream::adapters::{ChannelProcessor, ProcessorEvent};
use dify_stream::config::{FailureTiming, OrchestratorOptions};
use dify_stream::error::{DifyError, TransportError};
use dify_stream::query::{QueryOrchestrator, QueryState};
use dify_stream::sse::{MissingFieldPolicy, ParserOptions, StreamEvent};
use tokio_util::sync::CancellationToken;

fn one_line_per_chunk() -> Vec<String> {
    sample_stream().lines().map(|l| format!("{}\n", l)).collect()
}

#[tokio::test]
async fn test_processor_channel_sees_events_in_order() {
    let (processor, mut rx) = ChannelProcessor::new();
    let transport = Arc::new(ScriptedTransport::with_chunks([sample_stream()]));
    let orchestrator = QueryOrchestrator::new(transport, Arc::new(processor));

    let response = orchestrator
        .execute(Some(&test_request()), None, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(response.state(), QueryState::Completed);
    drop(orchestrator);

    let mut labels = Vec::new();
    while let Some(event) = rx.recv().await {
        labels.push(match event {
            ProcessorEvent::Text(e) => format!("text:{}", e.answer().unwrap_or_default()),
            ProcessorEvent::Audio(e) => format!("audio:{}", e.audio_payload().unwrap_or_default()),
        });
    }
    assert_eq!(
        labels,
        vec![
            "text:Hello".to_string(),
            format!("audio:{}", AUDIO_HELLO),
            "text: there".to_string(),
            format!("audio:{}", AUDIO_WORLD),
        ]
    );
}

#[tokio::test]
async fn test_callback_receives_every_event() {
    let transport = Arc::new(ScriptedTransport::with_chunks(one_line_per_chunk()));
    let orchestrator = QueryOrchestrator::new(transport, Arc::new(RecordingProcessor::new()));
    let mut seen: Vec<StreamEvent> = Vec::new();
    let mut callback = |event: &StreamEvent| seen.push(event.clone());

    let response = orchestrator
        .execute(Some(&test_request()), Some(&mut callback), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(seen.len(), 6);
    assert_eq!(response.event_count(), 6);
    assert!(seen.last().unwrap().is_end());
}

#[tokio::test]
async fn test_cancellation_mid_stream_keeps_delivered_events() {
    let transport =
        Arc::new(ScriptedTransport::with_chunks(one_line_per_chunk()).cancelling_after(2));
    let processor = Arc::new(RecordingProcessor::new());
    let orchestrator = QueryOrchestrator::new(transport, processor.clone());
    let token = CancellationToken::new();
    let mut delivered = 0;
    let mut callback = |_: &StreamEvent| delivered += 1;

    let err = orchestrator
        .execute(Some(&test_request()), Some(&mut callback), &token)
        .await
        .unwrap_err();

    assert_eq!(err, DifyError::Cancelled);
    assert_eq!(delivered, 2);
    assert_eq!(processor.calls(), vec![RecordedCall::Text("Hello".to_string())]);
}

#[tokio::test(start_paused = true)]
async fn test_measured_failure_timing_reports_elapsed() {
    let transport = ScriptedTransport::with_chunks(one_line_per_chunk())
        .with_chunk_delay(Duration::from_millis(100))
        .erroring_with(TransportError::Io {
            message: "connection reset".to_string(),
        });
    let options = OrchestratorOptions::new().with_failure_timing(FailureTiming::Measured);
    let orchestrator = QueryOrchestrator::with_options(
        Arc::new(transport),
        Arc::new(RecordingProcessor::new()),
        options,
    );

    let response = orchestrator
        .execute(Some(&test_request()), None, &CancellationToken::new())
        .await
        .unwrap();

    assert!(!response.is_success());
    assert_eq!(response.state(), QueryState::Failed);
    assert!(response.elapsed() >= Duration::from_millis(700));
    assert!(response.error_message().unwrap().contains("connection reset"));
}

#[tokio::test(start_paused = true)]
async fn test_zero_failure_timing_is_default() {
    let transport = ScriptedTransport::with_chunks(one_line_per_chunk())
        .with_chunk_delay(Duration::from_millis(100))
        .erroring_with(TransportError::Io {
            message: "connection reset".to_string(),
        });
    let orchestrator =
        QueryOrchestrator::new(Arc::new(transport), Arc::new(RecordingProcessor::new()));

    let response = orchestrator
        .execute(Some(&test_request()), None, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(response.elapsed(), Duration::ZERO);
    assert_eq!(response.event_count(), 6);
}

#[tokio::test]
async fn test_strict_parser_counts_incomplete_events() {
    let body = format!(
        "data: {{\"event\":\"message\",\"conversation_id\":\"c\"}}\n{}",
        message_line("ok", "c", "m")
    );
    let options = OrchestratorOptions::new()
        .with_parser(ParserOptions::default().with_missing_fields(MissingFieldPolicy::Error));
    let orchestrator = QueryOrchestrator::with_options(
        Arc::new(ScriptedTransport::with_chunks([body])),
        Arc::new(RecordingProcessor::new()),
        options,
    );

    let response = orchestrator
        .execute(Some(&test_request()), None, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(response.text(), "ok");
    assert_eq!(response.parse_error_count(), 1);
}

#[tokio::test]
async fn test_concurrent_queries_are_independent() {
    let transport = Arc::new(ScriptedTransport::with_chunks([sample_stream()]));
    let orchestrator = Arc::new(QueryOrchestrator::new(
        transport.clone(),
        Arc::new(RecordingProcessor::new()),
    ));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move {
                orchestrator
                    .execute(Some(&test_request()), None, &CancellationToken::new())
                    .await
            })
        })
        .collect();

    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        assert_eq!(response.text(), "Hello there");
        assert_eq!(response.audio_chunks().len(), 2);
    }
    assert_eq!(transport.call_count(), 4);
}
