//! SSE line parsing logic
//!
//! Classifies one line of a workflow stream into a [`ParsedLine`]. The
//! backend sends each event as a single `data: {json}` line and terminates the
//! stream with `data: [DONE]`. Every input maps to exactly one variant; the
//! parser never panics and never returns `Err`.

mod build;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::trace;

use crate::sse::events::ParsedLine;
use crate::sse::fields::{FieldMapping, RawFields};

/// Prefix of lines carrying an event payload.
pub const DATA_PREFIX: &str = "data: ";
/// Payload terminating the stream.
pub const DONE_MARKER: &str = "[DONE]";
/// Leading character of SSE comment (keep-alive) lines.
pub const COMMENT_PREFIX: char = ':';

/// What to do when a recognized event type lacks a required field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingFieldPolicy {
    /// Treat the line as valid but eventless
    #[default]
    Empty,
    /// Report the line as a parse error
    Error,
}

/// Parser configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParserOptions {
    #[serde(default)]
    pub field_mapping: FieldMapping,
    #[serde(default)]
    pub missing_fields: MissingFieldPolicy,
}

impl ParserOptions {
    pub fn with_field_mapping(mut self, field_mapping: FieldMapping) -> Self {
        self.field_mapping = field_mapping;
        self
    }

    pub fn with_missing_fields(mut self, policy: MissingFieldPolicy) -> Self {
        self.missing_fields = policy;
        self
    }
}

/// Stateless line classifier.
#[derive(Debug, Clone, Default)]
pub struct LineParser {
    options: ParserOptions,
}

impl LineParser {
    /// Parser with dual field naming and the lenient missing-field policy.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Classify a single line.
    pub fn parse_line(&self, line: &str) -> ParsedLine {
        if line.trim().is_empty() || line.starts_with(COMMENT_PREFIX) {
            return ParsedLine::Skipped;
        }

        // event:, id:, retry: and anything else without the data prefix
        let Some(rest) = line.strip_prefix(DATA_PREFIX) else {
            return ParsedLine::Skipped;
        };

        let content = rest.trim();
        if content == DONE_MARKER {
            return ParsedLine::EndMarker;
        }

        if !(content.starts_with('{') && content.ends_with('}')) {
            return parse_error("Content is not a JSON object", content);
        }

        let object: Map<String, Value> = match serde_json::from_str(content) {
            Ok(object) => object,
            Err(e) => return parse_error(format!("JSON parse error: {}", e), content),
        };

        let fields = RawFields::extract(&object, &self.options.field_mapping);
        if !fields.any_recognized() {
            return parse_error("No recognized event field in object", content);
        }

        build::build_event(fields, self.options.missing_fields, content)
    }
}

fn parse_error(message: impl Into<String>, raw: &str) -> ParsedLine {
    let message = message.into();
    trace!("Unparseable data line: {}", message);
    ParsedLine::ParseError {
        message,
        raw: raw.to_string(),
    }
}

static DEFAULT_PARSER: Lazy<LineParser> = Lazy::new(LineParser::new);

/// Shared parser with default options.
pub(crate) fn default_parser() -> &'static LineParser {
    &DEFAULT_PARSER
}

/// Classify a single line with default options.
pub fn parse_line(line: &str) -> ParsedLine {
    default_parser().parse_line(line)
}
