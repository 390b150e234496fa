use std::time::Duration;

use bytes::Bytes;

use super::state::QueryState;
use crate::error::{DifyError, DifyResult, TransportError};

/// Why a query failed without raising an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request was blank; nothing was sent
    InvalidRequest,
    /// The backend or network failed
    Transport,
}

/// Terminal result of one query. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResponse {
    success: bool,
    text: String,
    conversation_id: String,
    message_id: String,
    elapsed: Duration,
    error_message: Option<String>,
    failure_kind: Option<FailureKind>,
    audio_chunks: Vec<Bytes>,
    event_count: usize,
    parse_error_count: usize,
}

impl QueryResponse {
    /// Successful response.
    pub fn success(
        text: impl Into<String>,
        conversation_id: impl Into<String>,
        message_id: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            success: true,
            text: text.into(),
            conversation_id: conversation_id.into(),
            message_id: message_id.into(),
            elapsed,
            error_message: None,
            failure_kind: None,
            audio_chunks: Vec::new(),
            event_count: 0,
            parse_error_count: 0,
        }
    }

    /// Failed response carrying the reason.
    pub fn failure(kind: FailureKind, error_message: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            success: false,
            text: String::new(),
            conversation_id: String::new(),
            message_id: String::new(),
            elapsed,
            error_message: Some(error_message.into()),
            failure_kind: Some(kind),
            audio_chunks: Vec::new(),
            event_count: 0,
            parse_error_count: 0,
        }
    }

    pub fn with_audio_chunks(mut self, audio_chunks: Vec<Bytes>) -> Self {
        self.audio_chunks = audio_chunks;
        self
    }

    pub fn with_event_count(mut self, event_count: usize) -> Self {
        self.event_count = event_count;
        self
    }

    pub fn with_parse_error_count(mut self, parse_error_count: usize) -> Self {
        self.parse_error_count = parse_error_count;
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Concatenated message text, trimmed.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed.as_millis()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.failure_kind
    }

    /// Decoded audio fragments in arrival order.
    pub fn audio_chunks(&self) -> &[Bytes] {
        &self.audio_chunks
    }

    pub fn has_audio(&self) -> bool {
        !self.audio_chunks.is_empty()
    }

    pub fn total_audio_bytes(&self) -> usize {
        self.audio_chunks.iter().map(Bytes::len).sum()
    }

    /// Events dispatched before the stream ended.
    pub fn event_count(&self) -> usize {
        self.event_count
    }

    /// Data lines that could not be parsed.
    pub fn parse_error_count(&self) -> usize {
        self.parse_error_count
    }

    /// Terminal state this response represents.
    pub fn state(&self) -> QueryState {
        if self.success {
            QueryState::Completed
        } else {
            QueryState::Failed
        }
    }

    /// Convert a failure response into the matching error.
    ///
    /// Blank requests become `DifyError::InvalidRequest`, backend failures
    /// become `DifyError::Transport`.
    pub fn into_result(self) -> DifyResult<Self> {
        let Some(kind) = self.failure_kind else {
            return Ok(self);
        };
        let message = self.error_message.unwrap_or_default();
        match kind {
            FailureKind::InvalidRequest => Err(DifyError::InvalidRequest { message }),
            FailureKind::Transport => Err(DifyError::Transport(TransportError::Other { message })),
        }
    }
}
