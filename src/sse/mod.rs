//! SSE (Server-Sent Events) stream translation
//!
//! Parses the workflow backend's streaming format into typed events.
//! The wire format is line based:
//! - `data: {json}` - one event per line
//! - `data: [DONE]` - end of stream
//! - Lines starting with `:` - comments (ignored)
//! - Any other directive (`event:`, `id:`, `retry:`) - ignored
//!
//! # Module structure
//! - `events` - Event types (StreamEvent, EventKind, ParsedLine)
//! - `fields` - snake_case / camelCase field name mapping
//! - `parser` - Single-line classification (LineParser, parse_line)
//! - `line_buffer` - Reassembly of lines from network chunks
//! - `translator` - Whole-stream iteration, validation and statistics

mod events;
mod fields;
mod line_buffer;
mod parser;
mod translator;

pub use events::{EventBody, EventKind, LifecycleKind, ParsedLine, StreamEvent};
pub use fields::FieldMapping;
pub use line_buffer::LineBuffer;
pub use parser::{
    parse_line, LineParser, MissingFieldPolicy, ParserOptions, COMMENT_PREFIX, DATA_PREFIX,
    DONE_MARKER,
};
pub use translator::{
    event_statistics, parse_events, parse_events_from_reader, parse_events_from_reader_with,
    validate_stream, EventStatistics, ParsedEvents, ReaderEvents, StreamValidation,
};
