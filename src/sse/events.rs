//! Stream event definitions
//!
//! Contains the typed domain event (`StreamEvent`), its closed kind enum and
//! the per-line parse outcome (`ParsedLine`).

use bytes::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::audio::{self, AudioError};
use crate::error::StreamError;

/// Workflow lifecycle markers that carry no payload of interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleKind {
    WorkflowStarted,
    WorkflowFinished,
    NodeStarted,
    NodeFinished,
    TtsMessageEnd,
    MessageReplace,
    MessageFile,
    AgentThought,
    Ping,
}

impl LifecycleKind {
    pub const ALL: [LifecycleKind; 9] = [
        LifecycleKind::WorkflowStarted,
        LifecycleKind::WorkflowFinished,
        LifecycleKind::NodeStarted,
        LifecycleKind::NodeFinished,
        LifecycleKind::TtsMessageEnd,
        LifecycleKind::MessageReplace,
        LifecycleKind::MessageFile,
        LifecycleKind::AgentThought,
        LifecycleKind::Ping,
    ];

    /// Wire keyword for this marker.
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleKind::WorkflowStarted => "workflow_started",
            LifecycleKind::WorkflowFinished => "workflow_finished",
            LifecycleKind::NodeStarted => "node_started",
            LifecycleKind::NodeFinished => "node_finished",
            LifecycleKind::TtsMessageEnd => "tts_message_end",
            LifecycleKind::MessageReplace => "message_replace",
            LifecycleKind::MessageFile => "message_file",
            LifecycleKind::AgentThought => "agent_thought",
            LifecycleKind::Ping => "ping",
        }
    }

    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

/// Payload-free discriminant of a [`StreamEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Text fragment
    Message,
    /// Base64 audio fragment
    Audio,
    /// End of the assistant message
    End,
    /// Backend-reported error
    Error,
    /// Workflow lifecycle marker
    Lifecycle(LifecycleKind),
}

impl EventKind {
    /// Map a wire event name onto a kind. Unknown names yield `None`.
    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "message" | "agent_message" => Some(EventKind::Message),
            "tts_message" | "audio" => Some(EventKind::Audio),
            "message_end" => Some(EventKind::End),
            "error" => Some(EventKind::Error),
            other => LifecycleKind::from_wire(other).map(EventKind::Lifecycle),
        }
    }

    /// Canonical wire name for this kind.
    pub fn wire_name(&self) -> &'static str {
        match self {
            EventKind::Message => "message",
            EventKind::Audio => "tts_message",
            EventKind::End => "message_end",
            EventKind::Error => "error",
            EventKind::Lifecycle(kind) => kind.as_str(),
        }
    }

    /// Kinds after which the backend sends nothing meaningful for the message.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            EventKind::End | EventKind::Error | EventKind::Lifecycle(LifecycleKind::WorkflowFinished)
        )
    }
}

/// Variant-specific payload of a [`StreamEvent`].
#[derive(Debug, Clone, PartialEq)]
pub enum EventBody {
    Message { answer: String },
    Audio { audio: String },
    End,
    Error { message: Option<String> },
    Lifecycle(LifecycleKind),
}

/// One typed unit of a streaming response.
///
/// Built only through the factory functions, which reject blank required
/// fields. There are no setters: the `with_*` adapters consume the value and
/// are meant for use at construction time.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamEvent {
    body: EventBody,
    conversation_id: String,
    message_id: Option<String>,
    created_at: i64,
    task_id: Option<String>,
    workflow_run_id: Option<String>,
}

impl StreamEvent {
    fn build(body: EventBody, conversation_id: String) -> Result<Self, StreamError> {
        if conversation_id.trim().is_empty() {
            return Err(StreamError::blank("conversation_id"));
        }
        Ok(Self {
            body,
            conversation_id,
            message_id: None,
            created_at: Utc::now().timestamp(),
            task_id: None,
            workflow_run_id: None,
        })
    }

    /// Text fragment. `answer` must be non-empty and `message_id` non-blank.
    pub fn message(
        answer: impl Into<String>,
        conversation_id: impl Into<String>,
        message_id: impl Into<String>,
    ) -> Result<Self, StreamError> {
        let answer = answer.into();
        let message_id = message_id.into();
        if answer.is_empty() {
            return Err(StreamError::blank("answer"));
        }
        if message_id.trim().is_empty() {
            return Err(StreamError::blank("message_id"));
        }
        let mut event = Self::build(EventBody::Message { answer }, conversation_id.into())?;
        event.message_id = Some(message_id);
        Ok(event)
    }

    /// Audio fragment carrying a base64 payload.
    pub fn audio(
        audio: impl Into<String>,
        conversation_id: impl Into<String>,
        message_id: Option<String>,
    ) -> Result<Self, StreamError> {
        let audio = audio.into();
        if audio.trim().is_empty() {
            return Err(StreamError::blank("audio"));
        }
        let mut event = Self::build(EventBody::Audio { audio }, conversation_id.into())?;
        event.message_id = non_blank(message_id);
        Ok(event)
    }

    /// End-of-message marker.
    pub fn end(
        conversation_id: impl Into<String>,
        message_id: Option<String>,
    ) -> Result<Self, StreamError> {
        let mut event = Self::build(EventBody::End, conversation_id.into())?;
        event.message_id = non_blank(message_id);
        Ok(event)
    }

    /// Backend-reported error.
    pub fn error(
        conversation_id: impl Into<String>,
        message: Option<String>,
    ) -> Result<Self, StreamError> {
        Self::build(
            EventBody::Error {
                message: non_blank(message),
            },
            conversation_id.into(),
        )
    }

    /// Workflow lifecycle marker.
    pub fn lifecycle(
        kind: LifecycleKind,
        conversation_id: impl Into<String>,
    ) -> Result<Self, StreamError> {
        Self::build(EventBody::Lifecycle(kind), conversation_id.into())
    }

    /// Override the construction timestamp. Non-positive values are ignored.
    pub fn with_created_at(mut self, created_at: i64) -> Self {
        if created_at > 0 {
            self.created_at = created_at;
        }
        self
    }

    /// Attach a message id when the factory did not take one.
    pub fn with_message_id(mut self, message_id: Option<String>) -> Self {
        if self.message_id.is_none() {
            self.message_id = non_blank(message_id);
        }
        self
    }

    pub fn with_task_id(mut self, task_id: Option<String>) -> Self {
        self.task_id = non_blank(task_id);
        self
    }

    pub fn with_workflow_run_id(mut self, workflow_run_id: Option<String>) -> Self {
        self.workflow_run_id = non_blank(workflow_run_id);
        self
    }

    pub fn kind(&self) -> EventKind {
        match &self.body {
            EventBody::Message { .. } => EventKind::Message,
            EventBody::Audio { .. } => EventKind::Audio,
            EventBody::End => EventKind::End,
            EventBody::Error { .. } => EventKind::Error,
            EventBody::Lifecycle(kind) => EventKind::Lifecycle(*kind),
        }
    }

    pub fn body(&self) -> &EventBody {
        &self.body
    }

    /// Text fragment, for message events.
    pub fn answer(&self) -> Option<&str> {
        match &self.body {
            EventBody::Message { answer } => Some(answer),
            _ => None,
        }
    }

    /// Base64 payload, for audio events.
    pub fn audio_payload(&self) -> Option<&str> {
        match &self.body {
            EventBody::Audio { audio } => Some(audio),
            _ => None,
        }
    }

    /// Error text, for error events that carried one.
    pub fn error_message(&self) -> Option<&str> {
        match &self.body {
            EventBody::Error { message } => message.as_deref(),
            _ => None,
        }
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    pub fn message_id(&self) -> Option<&str> {
        self.message_id.as_deref()
    }

    /// Unix seconds.
    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    pub fn workflow_run_id(&self) -> Option<&str> {
        self.workflow_run_id.as_deref()
    }

    pub fn is_message(&self) -> bool {
        self.kind() == EventKind::Message
    }

    pub fn is_audio(&self) -> bool {
        self.kind() == EventKind::Audio
    }

    pub fn is_end(&self) -> bool {
        self.kind() == EventKind::End
    }

    pub fn is_error(&self) -> bool {
        self.kind() == EventKind::Error
    }

    /// Decode the audio payload. Non-audio events report `AudioError::Empty`.
    pub fn decode_audio(&self) -> Result<Bytes, AudioError> {
        audio::decode(self.audio_payload().unwrap_or_default())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Outcome of parsing a single SSE line. Exactly one variant applies.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    /// Blank line, comment, or a directive other than `data:`
    Skipped,
    /// The `[DONE]` terminator
    EndMarker,
    /// A data line that was understood. `None` when it produced no event
    /// (unknown event type, or a known type lacking required fields).
    Valid(Option<StreamEvent>),
    /// A data line that could not be interpreted
    ParseError { message: String, raw: String },
}

impl ParsedLine {
    pub fn is_skipped(&self) -> bool {
        matches!(self, ParsedLine::Skipped)
    }

    pub fn is_end_marker(&self) -> bool {
        matches!(self, ParsedLine::EndMarker)
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ParsedLine::Valid(_))
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(self, ParsedLine::ParseError { .. })
    }

    /// The produced event, if any.
    pub fn event(&self) -> Option<&StreamEvent> {
        match self {
            ParsedLine::Valid(event) => event.as_ref(),
            _ => None,
        }
    }

    pub fn into_event(self) -> Option<StreamEvent> {
        match self {
            ParsedLine::Valid(event) => event,
            _ => None,
        }
    }

    /// Convert a parse error into a `StreamError`.
    pub fn error(&self) -> Option<StreamError> {
        match self {
            ParsedLine::ParseError { message, raw } => Some(StreamError::ParseError {
                message: message.clone(),
                raw: raw.clone(),
            }),
            _ => None,
        }
    }
}
