//! Event construction from extracted fields

use tracing::debug;

use super::MissingFieldPolicy;
use crate::error::StreamError;
use crate::sse::events::{EventKind, ParsedLine, StreamEvent};
use crate::sse::fields::RawFields;

/// Turn extracted fields into a `ParsedLine`, applying the missing-field policy.
pub(super) fn build_event(fields: RawFields, policy: MissingFieldPolicy, raw: &str) -> ParsedLine {
    let Some(name) = fields.event.as_deref() else {
        debug!("Data line without event type");
        return ParsedLine::Valid(None);
    };

    let Some(kind) = EventKind::from_wire(name) else {
        debug!("Ignoring unknown event type: {}", name);
        return ParsedLine::Valid(None);
    };

    match construct(kind, fields) {
        Ok(event) => ParsedLine::Valid(Some(event)),
        Err(e) => match policy {
            MissingFieldPolicy::Empty => {
                debug!("Dropping {} event: {}", kind.wire_name(), e);
                ParsedLine::Valid(None)
            }
            MissingFieldPolicy::Error => ParsedLine::ParseError {
                message: format!("{} event rejected: {}", kind.wire_name(), e),
                raw: raw.to_string(),
            },
        },
    }
}

fn construct(kind: EventKind, fields: RawFields) -> Result<StreamEvent, StreamError> {
    let RawFields {
        conversation_id,
        message_id,
        answer,
        audio,
        created_at,
        task_id,
        workflow_run_id,
        error_message,
        ..
    } = fields;
    let conversation_id = conversation_id.unwrap_or_default();

    let event = match kind {
        EventKind::Message => StreamEvent::message(
            answer.unwrap_or_default(),
            conversation_id,
            message_id.unwrap_or_default(),
        )?,
        EventKind::Audio => {
            StreamEvent::audio(audio.unwrap_or_default(), conversation_id, message_id)?
        }
        EventKind::End => StreamEvent::end(conversation_id, message_id)?,
        EventKind::Error => {
            StreamEvent::error(conversation_id, error_message)?.with_message_id(message_id)
        }
        EventKind::Lifecycle(lifecycle) => {
            StreamEvent::lifecycle(lifecycle, conversation_id)?.with_message_id(message_id)
        }
    };

    Ok(event
        .with_created_at(created_at.unwrap_or_default())
        .with_task_id(task_id)
        .with_workflow_run_id(workflow_run_id))
}
