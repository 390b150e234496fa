//! Recorded stream traces
//!
//! A trace is a JSON document captured from a production run:
//!
//! ```json
//! {
//!   "recordedAt": "2025-01-16T09:00:00Z",
//!   "eventCount": 2,
//!   "totalDurationMs": 250.0,
//!   "events": [
//!     {"timestamp": 0, "eventType": "message", "answer": "Hi", "conversationId": "c1", "messageId": "m1"},
//!     {"timestamp": 250, "eventType": "message_end", "conversationId": "c1", "messageId": "m1"}
//!   ]
//! }
//! ```
//!
//! `timestamp` is milliseconds since the start of the recording.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ReplayError;

/// One recorded event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceEvent {
    /// Milliseconds since the start of the recording
    pub timestamp: f64,
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub audio: String,
    #[serde(default)]
    pub conversation_id: String,
    #[serde(default)]
    pub message_id: String,
    #[serde(default)]
    pub task_id: String,
}

/// Backend wire shape of a replayed event. Empty fields are omitted.
#[derive(Serialize)]
struct WireEvent<'a> {
    event: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    conversation_id: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    message_id: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    answer: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    audio: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    task_id: &'a str,
    created_at: i64,
}

impl TraceEvent {
    pub fn new(timestamp: f64, event_type: impl Into<String>) -> Self {
        Self {
            timestamp,
            event_type: event_type.into(),
            ..Default::default()
        }
    }

    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.answer = answer.into();
        self
    }

    pub fn with_audio(mut self, audio: impl Into<String>) -> Self {
        self.audio = audio.into();
        self
    }

    pub fn with_ids(
        mut self,
        conversation_id: impl Into<String>,
        message_id: impl Into<String>,
    ) -> Self {
        self.conversation_id = conversation_id.into();
        self.message_id = message_id.into();
        self
    }

    pub fn with_task_id(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = task_id.into();
        self
    }

    /// Render as the JSON payload of a `data:` line.
    pub fn to_wire_json(&self, created_at: i64) -> String {
        let wire = WireEvent {
            event: &self.event_type,
            conversation_id: &self.conversation_id,
            message_id: &self.message_id,
            answer: &self.answer,
            audio: &self.audio,
            task_id: &self.task_id,
            created_at,
        };
        // Serializing borrowed strings and an integer cannot fail
        serde_json::to_string(&wire).unwrap_or_default()
    }
}

/// A loaded recording. Events are kept sorted by timestamp and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingTrace {
    #[serde(default)]
    recorded_at: String,
    #[serde(default)]
    event_count: usize,
    #[serde(default)]
    total_duration_ms: f64,
    #[serde(default)]
    events: Vec<TraceEvent>,
}

impl RecordingTrace {
    /// Build a trace from events, deriving the header fields.
    pub fn from_events(events: Vec<TraceEvent>) -> Self {
        let total_duration_ms = events.iter().map(|e| e.timestamp).fold(0.0, f64::max);
        let mut trace = Self {
            recorded_at: Utc::now().to_rfc3339(),
            event_count: events.len(),
            total_duration_ms,
            events,
        };
        trace.sort_events();
        trace
    }

    /// Load a trace file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ReplayError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ReplayError::Io {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        })?;
        let trace = Self::from_json(&content)?;
        info!(
            "Loaded trace {}: {} events, {}ms",
            path.display(),
            trace.events.len(),
            trace.total_duration_ms
        );
        Ok(trace)
    }

    /// Parse a trace document.
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        let mut trace: Self =
            serde_json::from_str(json).map_err(|e| ReplayError::InvalidFormat {
                message: e.to_string(),
            })?;
        trace.sort_events();
        Ok(trace)
    }

    /// Write the trace as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ReplayError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|e| ReplayError::InvalidFormat {
            message: e.to_string(),
        })?;
        fs::write(path, json).map_err(|e| ReplayError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    // Stable: events with equal timestamps keep their recorded order
    fn sort_events(&mut self) {
        self.events.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
    }

    /// All events in timestamp order.
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Events of one wire type, in timestamp order.
    pub fn events_by_type<'a>(
        &'a self,
        event_type: &'a str,
    ) -> impl Iterator<Item = &'a TraceEvent> + 'a {
        self.events
            .iter()
            .filter(move |e| e.event_type == event_type)
    }

    /// Event count as recorded in the header.
    pub fn event_count(&self) -> usize {
        self.event_count
    }

    pub fn total_duration_ms(&self) -> f64 {
        self.total_duration_ms
    }

    pub fn recorded_at(&self) -> &str {
        &self.recorded_at
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
