//! Wire field naming
//!
//! The backend and the recording tools disagree on field naming
//! (`conversation_id` vs `conversationId`). `FieldMapping` lists the accepted
//! key spellings per logical field; the first key present in the object wins.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Accepted JSON keys for each logical event field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub event: Vec<String>,
    pub conversation_id: Vec<String>,
    pub message_id: Vec<String>,
    pub answer: Vec<String>,
    pub audio: Vec<String>,
    pub created_at: Vec<String>,
    pub task_id: Vec<String>,
    pub workflow_run_id: Vec<String>,
    pub error_message: Vec<String>,
}

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

impl FieldMapping {
    /// Backend naming only.
    pub fn snake_case() -> Self {
        Self {
            event: keys(&["event"]),
            conversation_id: keys(&["conversation_id"]),
            message_id: keys(&["message_id"]),
            answer: keys(&["answer"]),
            audio: keys(&["audio"]),
            created_at: keys(&["created_at"]),
            task_id: keys(&["task_id"]),
            workflow_run_id: keys(&["workflow_run_id"]),
            error_message: keys(&["message"]),
        }
    }

    /// Recording naming only.
    pub fn camel_case() -> Self {
        Self {
            event: keys(&["eventType"]),
            conversation_id: keys(&["conversationId"]),
            message_id: keys(&["messageId"]),
            answer: keys(&["answer"]),
            audio: keys(&["audio"]),
            created_at: keys(&["createdAt"]),
            task_id: keys(&["taskId"]),
            workflow_run_id: keys(&["workflowRunId"]),
            error_message: keys(&["message"]),
        }
    }

    /// Both spellings, snake_case first.
    pub fn dual() -> Self {
        Self {
            event: keys(&["event", "eventType"]),
            conversation_id: keys(&["conversation_id", "conversationId"]),
            message_id: keys(&["message_id", "messageId"]),
            answer: keys(&["answer"]),
            audio: keys(&["audio"]),
            created_at: keys(&["created_at", "createdAt"]),
            task_id: keys(&["task_id", "taskId"]),
            workflow_run_id: keys(&["workflow_run_id", "workflowRunId"]),
            error_message: keys(&["message"]),
        }
    }
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self::dual()
    }
}

/// Fields pulled out of one JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RawFields {
    pub event: Option<String>,
    pub conversation_id: Option<String>,
    pub message_id: Option<String>,
    pub answer: Option<String>,
    pub audio: Option<String>,
    pub created_at: Option<i64>,
    pub task_id: Option<String>,
    pub workflow_run_id: Option<String>,
    pub error_message: Option<String>,
}

impl RawFields {
    pub fn extract(object: &Map<String, Value>, mapping: &FieldMapping) -> Self {
        Self {
            event: lookup_string(object, &mapping.event),
            conversation_id: lookup_string(object, &mapping.conversation_id),
            message_id: lookup_string(object, &mapping.message_id),
            answer: lookup_string(object, &mapping.answer),
            audio: lookup_string(object, &mapping.audio),
            created_at: lookup_timestamp(object, &mapping.created_at),
            task_id: lookup_string(object, &mapping.task_id),
            workflow_run_id: lookup_string(object, &mapping.workflow_run_id),
            error_message: lookup_string(object, &mapping.error_message),
        }
    }

    /// At least one mapped field was present.
    pub fn any_recognized(&self) -> bool {
        self.event.is_some()
            || self.conversation_id.is_some()
            || self.message_id.is_some()
            || self.answer.is_some()
            || self.audio.is_some()
            || self.created_at.is_some()
            || self.task_id.is_some()
            || self.workflow_run_id.is_some()
    }
}

fn lookup<'a>(object: &'a Map<String, Value>, names: &[String]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| object.get(name))
        .find(|value| !value.is_null())
}

fn lookup_string(object: &Map<String, Value>, names: &[String]) -> Option<String> {
    match lookup(object, names)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lookup_timestamp(object: &Map<String, Value>, names: &[String]) -> Option<i64> {
    match lookup(object, names)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_dual_accepts_both_spellings() {
        let snake = object(json!({"event": "message", "conversation_id": "c1"}));
        let camel = object(json!({"eventType": "message", "conversationId": "c1"}));
        let mapping = FieldMapping::dual();
        assert_eq!(RawFields::extract(&snake, &mapping), RawFields::extract(&camel, &mapping));
    }

    #[test]
    fn test_snake_only_ignores_camel() {
        let camel = object(json!({"eventType": "message", "conversationId": "c1"}));
        let fields = RawFields::extract(&camel, &FieldMapping::snake_case());
        assert!(!fields.any_recognized());
    }

    #[test]
    fn test_null_values_fall_through() {
        let obj = object(json!({"message_id": null, "messageId": "m1"}));
        let fields = RawFields::extract(&obj, &FieldMapping::dual());
        assert_eq!(fields.message_id.as_deref(), Some("m1"));
    }

    #[test]
    fn test_timestamp_forms() {
        let mapping = FieldMapping::dual();
        let int = object(json!({"created_at": 1705395600}));
        let float = object(json!({"created_at": 1705395600.9}));
        let text = object(json!({"createdAt": "1705395600"}));
        assert_eq!(RawFields::extract(&int, &mapping).created_at, Some(1705395600));
        assert_eq!(RawFields::extract(&float, &mapping).created_at, Some(1705395600));
        assert_eq!(RawFields::extract(&text, &mapping).created_at, Some(1705395600));
    }

    #[test]
    fn test_error_message_alone_is_not_recognized() {
        let obj = object(json!({"message": "boom"}));
        let fields = RawFields::extract(&obj, &FieldMapping::dual());
        assert_eq!(fields.error_message.as_deref(), Some("boom"));
        assert!(!fields.any_recognized());
    }
}
