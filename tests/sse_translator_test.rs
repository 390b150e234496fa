//! Whole-stream translation tests: bodies, live readers, validation and
//! statistics.

mod common;

use std::io::Cursor;

use common::*;
use dify_stream::sse::{
    event_statistics, parse_events, parse_events_from_reader, parse_line, validate_stream,
    EventKind, LifecycleKind, ParsedLine,
};

#[test]
fn test_sample_stream_yields_events_in_order() {
    let body = sample_stream();
    let kinds: Vec<EventKind> = parse_events(&body).map(|e| e.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::Lifecycle(LifecycleKind::WorkflowStarted),
            EventKind::Message,
            EventKind::Audio,
            EventKind::Message,
            EventKind::Audio,
            EventKind::End,
        ]
    );
}

#[test]
fn test_iteration_is_restartable() {
    let body = sample_stream();
    let events = parse_events(&body);
    let first: Vec<_> = events.clone().collect();
    let second: Vec<_> = events.collect();
    assert_eq!(first, second);
}

#[test]
fn test_stops_permanently_at_done_marker() {
    let body = format!(
        "{}{}{}",
        message_line("before", "c", "m"),
        DONE_LINE,
        message_line("after", "c", "m")
    );
    let answers: Vec<String> = parse_events(&body)
        .filter_map(|e| e.answer().map(str::to_string))
        .collect();
    assert_eq!(answers, vec!["before".to_string()]);
}

#[test]
fn test_mixed_line_endings() {
    let body = format!(
        "{}\r\n{}\r{}",
        message_line("a", "c", "m").trim_end(),
        message_line("b", "c", "m").trim_end(),
        message_line("c", "c", "m")
    );
    assert_eq!(parse_events(&body).count(), 3);
}

#[test]
fn test_malformed_lines_are_skipped() {
    let body = format!(
        ": keep-alive\nevent: message\ndata: {{broken\ndata: not json\n{}",
        message_line("ok", "c", "m")
    );
    let events: Vec<_> = parse_events(&body).collect();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].answer(), Some("ok"));
}

#[test]
fn test_reader_matches_body_parsing() {
    let body = sample_stream();
    let from_reader: Vec<_> = parse_events_from_reader(Cursor::new(body.as_bytes()))
        .collect::<Result<_, _>>()
        .unwrap();
    let from_body: Vec<_> = parse_events(&body).collect();
    assert_eq!(from_reader, from_body);
}

#[test]
fn test_validate_sample_stream() {
    let report = validate_stream(&sample_stream());
    assert!(report.is_valid);
    assert!(report.has_end_marker);
    assert_eq!(report.total_lines, 7);
    assert_eq!(report.text_event_count, 2);
    assert_eq!(report.audio_event_count, 2);
    assert_eq!(report.error_event_count, 0);
    assert_eq!(report.parse_error_count, 0);
}

#[test]
fn test_validate_reports_parse_errors_past_done() {
    let body = format!("{}{}data: {{bad\n", message_line("x", "c", "m"), DONE_LINE);
    let report = validate_stream(&body);
    assert!(!report.is_valid);
    assert!(report.has_end_marker);
    assert_eq!(report.parse_error_count, 1);
    assert_eq!(report.parse_errors.len(), 1);
}

#[test]
fn test_statistics_over_sample_stream() {
    let body = sample_stream();
    let events: Vec<_> = parse_events(&body).collect();
    let stats = event_statistics(&events);

    assert_eq!(stats.total_events, 6);
    assert_eq!(stats.message_count, 2);
    assert_eq!(stats.audio_count, 2);
    assert_eq!(stats.valid_audio_count, 2);
    assert_eq!(stats.end_count, 1);
    assert_eq!(stats.lifecycle_count(LifecycleKind::WorkflowStarted), 1);
    assert_eq!(stats.lifecycle_count(LifecycleKind::Ping), 0);
}

#[test]
fn test_camel_case_payload() {
    let line = r#"data: {"eventType":"message","answer":"hi","conversationId":"c","messageId":"m","createdAt":1700000000}"#;
    match parse_line(line) {
        ParsedLine::Valid(Some(event)) => {
            assert_eq!(event.conversation_id(), "c");
            assert_eq!(event.message_id(), Some("m"));
            assert_eq!(event.created_at(), 1_700_000_000);
        }
        other => panic!("expected event, got {:?}", other),
    }
}
