//! Recording response processor for testing.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::sse::StreamEvent;
use crate::traits::ResponseProcessor;

/// One processor invocation, with the event's payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Audio(String),
    Text(String),
}

/// Processor that records every call in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingProcessor {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl RecordingProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    fn recorded(&self) -> MutexGuard<'_, Vec<RecordedCall>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.recorded().clone()
    }

    pub fn clear(&self) {
        self.recorded().clear();
    }
}

impl ResponseProcessor for RecordingProcessor {
    fn process_audio(&self, event: &StreamEvent) {
        let payload = event.audio_payload().unwrap_or_default().to_string();
        self.recorded().push(RecordedCall::Audio(payload));
    }

    fn process_text(&self, event: &StreamEvent) {
        let answer = event.answer().unwrap_or_default().to_string();
        self.recorded().push(RecordedCall::Text(answer));
    }
}
