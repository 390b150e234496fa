//! Common fixtures for integration tests.
//!
//! Builders for SSE lines in the backend's wire format plus a ready-made
//! configuration and request.
//!
//! # Example
//!
//! ```ignore
//! use common::{message_line, end_line, DONE_LINE};
//!
//! let body = [message_line("Hi", "c1", "m1"), end_line("c1", "m1")].concat() + DONE_LINE;
//! ```

#![allow(dead_code)]

use dify_stream::config::ClientConfig;
use dify_stream::models::QueryRequest;
use serde_json::json;

pub const API_KEY: &str = "app-test-key-0123456789";
pub const DONE_LINE: &str = "data: [DONE]\n";

/// "Hello" as base64
pub const AUDIO_HELLO: &str = "SGVsbG8=";
/// "World" as base64
pub const AUDIO_WORLD: &str = "V29ybGQ=";

fn data_line(value: serde_json::Value) -> String {
    format!("data: {}\n", value)
}

pub fn message_line(answer: &str, conversation_id: &str, message_id: &str) -> String {
    data_line(json!({
        "event": "message",
        "answer": answer,
        "conversation_id": conversation_id,
        "message_id": message_id,
        "created_at": 1_700_000_000,
    }))
}

pub fn audio_line(audio: &str, conversation_id: &str) -> String {
    data_line(json!({
        "event": "tts_message",
        "audio": audio,
        "conversation_id": conversation_id,
        "created_at": 1_700_000_001,
    }))
}

pub fn end_line(conversation_id: &str, message_id: &str) -> String {
    data_line(json!({
        "event": "message_end",
        "conversation_id": conversation_id,
        "message_id": message_id,
        "created_at": 1_700_000_005,
    }))
}

pub fn lifecycle_line(event: &str, conversation_id: &str) -> String {
    data_line(json!({
        "event": event,
        "conversation_id": conversation_id,
        "workflow_run_id": "run-1",
    }))
}

/// A typical answer: workflow start, two text fragments, two audio
/// fragments, end, done marker.
pub fn sample_stream() -> String {
    [
        lifecycle_line("workflow_started", "conv-1"),
        message_line("Hello", "conv-1", "msg-1"),
        audio_line(AUDIO_HELLO, "conv-1"),
        message_line(" there", "conv-1", "msg-1"),
        audio_line(AUDIO_WORLD, "conv-1"),
        end_line("conv-1", "msg-1"),
        DONE_LINE.to_string(),
    ]
    .concat()
}

pub fn test_config(api_url: &str) -> ClientConfig {
    ClientConfig::new(API_KEY, api_url).expect("valid test config")
}

pub fn test_request() -> QueryRequest {
    QueryRequest::new("What is the weather?", "viewer-42", "").expect("valid test request")
}
