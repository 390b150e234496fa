//! Whole-stream translation
//!
//! Turns a complete (or live) stream body into typed events, and provides the
//! diagnostics used when inspecting captured streams.

use std::collections::{BTreeMap, VecDeque};
use std::io::{self, BufRead};
use std::iter::FusedIterator;
use std::str::Split;

use serde::Serialize;
use tracing::debug;

use crate::sse::events::{EventKind, LifecycleKind, ParsedLine, StreamEvent};
use crate::sse::line_buffer::LineBuffer;
use crate::sse::parser::{default_parser, LineParser};

fn is_line_break(c: char) -> bool {
    c == '\r' || c == '\n'
}

type Lines<'a> = Split<'a, fn(char) -> bool>;

fn split_lines(body: &str) -> Lines<'_> {
    body.split(is_line_break as fn(char) -> bool)
}

/// Lazy iterator over the events of a stream body.
///
/// Yields only lines that produced an event, stops for good at the first
/// end marker, and skips parse errors. Call [`parse_events`] again to
/// iterate from the beginning.
#[derive(Debug, Clone)]
pub struct ParsedEvents<'a> {
    lines: Lines<'a>,
    parser: &'a LineParser,
    finished: bool,
}

impl<'a> Iterator for ParsedEvents<'a> {
    type Item = StreamEvent;

    fn next(&mut self) -> Option<StreamEvent> {
        if self.finished {
            return None;
        }
        for line in self.lines.by_ref() {
            match self.parser.parse_line(line) {
                ParsedLine::EndMarker => {
                    self.finished = true;
                    return None;
                }
                ParsedLine::Valid(Some(event)) => return Some(event),
                ParsedLine::ParseError { message, .. } => {
                    debug!("Skipping unparseable line: {}", message);
                }
                ParsedLine::Valid(None) | ParsedLine::Skipped => {}
            }
        }
        self.finished = true;
        None
    }
}

impl FusedIterator for ParsedEvents<'_> {}

impl LineParser {
    /// Iterate the events of `body` using this parser's options.
    pub fn parse_events<'a>(&'a self, body: &'a str) -> ParsedEvents<'a> {
        ParsedEvents {
            lines: split_lines(body),
            parser: self,
            finished: false,
        }
    }
}

/// Iterate the events of `body` with default parser options.
pub fn parse_events(body: &str) -> ParsedEvents<'_> {
    default_parser().parse_events(body)
}

/// Live line-by-line event feed over a reader.
///
/// Same rules as [`ParsedEvents`], including `\n`, `\r\n` and lone `\r`
/// line breaks. Read errors are surfaced once and end the iteration.
#[derive(Debug)]
pub struct ReaderEvents<R> {
    reader: R,
    parser: LineParser,
    buffer: LineBuffer,
    lines: VecDeque<String>,
    eof: bool,
    finished: bool,
}

impl<R: BufRead> ReaderEvents<R> {
    // Feed the next reader buffer into the line buffer
    fn fill(&mut self) -> io::Result<()> {
        loop {
            match self.reader.fill_buf() {
                Ok([]) => {
                    self.eof = true;
                    self.lines.extend(self.buffer.finish());
                    return Ok(());
                }
                Ok(bytes) => {
                    let consumed = bytes.len();
                    let lines = self.buffer.push_bytes(bytes);
                    self.reader.consume(consumed);
                    self.lines.extend(lines);
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: BufRead> Iterator for ReaderEvents<R> {
    type Item = io::Result<StreamEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            let Some(line) = self.lines.pop_front() else {
                if self.eof {
                    self.finished = true;
                } else if let Err(e) = self.fill() {
                    self.finished = true;
                    return Some(Err(e));
                }
                continue;
            };
            match self.parser.parse_line(&line) {
                ParsedLine::EndMarker => self.finished = true,
                ParsedLine::Valid(Some(event)) => return Some(Ok(event)),
                ParsedLine::ParseError { message, .. } => {
                    debug!("Skipping unparseable line: {}", message);
                }
                ParsedLine::Valid(None) | ParsedLine::Skipped => {}
            }
        }
        None
    }
}

impl<R: BufRead> FusedIterator for ReaderEvents<R> {}

/// Read events from `reader` as lines arrive, with default parser options.
pub fn parse_events_from_reader<R: BufRead>(reader: R) -> ReaderEvents<R> {
    parse_events_from_reader_with(reader, LineParser::new())
}

/// Read events from `reader` as lines arrive, with a custom parser.
pub fn parse_events_from_reader_with<R: BufRead>(reader: R, parser: LineParser) -> ReaderEvents<R> {
    ReaderEvents {
        reader,
        parser,
        buffer: LineBuffer::new(),
        lines: VecDeque::new(),
        eof: false,
        finished: false,
    }
}

/// Diagnostic report over every non-empty line of a stream body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StreamValidation {
    pub is_valid: bool,
    pub has_end_marker: bool,
    pub total_lines: usize,
    pub valid_lines: usize,
    pub skipped_lines: usize,
    pub text_event_count: usize,
    pub audio_event_count: usize,
    pub error_event_count: usize,
    pub parse_error_count: usize,
    pub parse_errors: Vec<String>,
}

impl LineParser {
    /// Walk every non-empty line of `body`, without stopping at the end marker.
    pub fn validate_stream(&self, body: &str) -> StreamValidation {
        let mut report = StreamValidation::default();

        for line in split_lines(body).filter(|l| !l.is_empty()) {
            report.total_lines += 1;
            match self.parse_line(line) {
                ParsedLine::Skipped => report.skipped_lines += 1,
                ParsedLine::EndMarker => {
                    report.has_end_marker = true;
                    report.valid_lines += 1;
                }
                ParsedLine::Valid(event) => {
                    report.valid_lines += 1;
                    match event.map(|e| e.kind()) {
                        Some(EventKind::Message) => report.text_event_count += 1,
                        Some(EventKind::Audio) => report.audio_event_count += 1,
                        Some(EventKind::Error) => report.error_event_count += 1,
                        _ => {}
                    }
                }
                ParsedLine::ParseError { message, .. } => {
                    report.parse_error_count += 1;
                    report.parse_errors.push(message);
                }
            }
        }

        report.is_valid = report.parse_error_count == 0;
        report
    }
}

/// Validate `body` with default parser options.
pub fn validate_stream(body: &str) -> StreamValidation {
    default_parser().validate_stream(body)
}

/// Counts and time span over a set of events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventStatistics {
    pub total_events: usize,
    pub message_count: usize,
    /// Message events whose answer is not whitespace-only
    pub valid_message_count: usize,
    pub audio_count: usize,
    /// Audio events whose payload decodes
    pub valid_audio_count: usize,
    pub end_count: usize,
    pub error_count: usize,
    pub lifecycle_counts: BTreeMap<LifecycleKind, usize>,
    pub first_created_at: Option<i64>,
    pub last_created_at: Option<i64>,
}

impl EventStatistics {
    pub fn lifecycle_count(&self, kind: LifecycleKind) -> usize {
        self.lifecycle_counts.get(&kind).copied().unwrap_or(0)
    }

    /// Seconds between the earliest and latest `created_at`.
    pub fn duration_secs(&self) -> i64 {
        match (self.first_created_at, self.last_created_at) {
            (Some(first), Some(last)) => last - first,
            _ => 0,
        }
    }
}

/// Summarize a set of events.
pub fn event_statistics<'a, I>(events: I) -> EventStatistics
where
    I: IntoIterator<Item = &'a StreamEvent>,
{
    let mut stats = EventStatistics::default();

    for event in events {
        stats.total_events += 1;
        match event.kind() {
            EventKind::Message => {
                stats.message_count += 1;
                if event.answer().is_some_and(|a| !a.trim().is_empty()) {
                    stats.valid_message_count += 1;
                }
            }
            EventKind::Audio => {
                stats.audio_count += 1;
                if event.decode_audio().is_ok() {
                    stats.valid_audio_count += 1;
                }
            }
            EventKind::End => stats.end_count += 1,
            EventKind::Error => stats.error_count += 1,
            EventKind::Lifecycle(kind) => *stats.lifecycle_counts.entry(kind).or_insert(0) += 1,
        }

        let ts = event.created_at();
        stats.first_created_at = Some(stats.first_created_at.map_or(ts, |f| f.min(ts)));
        stats.last_created_at = Some(stats.last_created_at.map_or(ts, |l| l.max(ts)));
    }

    stats
}
