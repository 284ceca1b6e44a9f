//! The export parser.
//!
//! [`ExportParser`] turns the text of a WhatsApp export into an ordered list
//! of [`ConversationEvent`]s and the participants who wrote them. It is a pure
//! function of its input and [`ParserConfig`]; reading files is up to the
//! caller.
//!
//! # Example
//!
//! ```rust
//! use chatpulse::ExportParser;
//!
//! let text = "\
//! [01/02/23, 10:00:15 AM] Alice: Hello
//! there
//! [01/02/23, 10:01:00 AM] Alice added Bob";
//!
//! let export = ExportParser::new().parse_str(text);
//!
//! assert_eq!(export.events.len(), 2);
//! assert_eq!(export.events[0].content(), "Hello\nthere");
//! assert_eq!(export.events[1].sender(), None);
//! assert_eq!(export.participants, ["Alice"]);
//! ```
//!
//! # Streaming
//!
//! For large exports use [`ExportParser::stream`], which yields the same
//! events from any [`BufRead`] without reading the whole input first.

use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::config::ParserConfig;
use crate::core::ParseSummary;
use crate::error::{ChatpulseError, Result};
use crate::event::ConversationEvent;
use crate::parsing::EventAssembler;
use crate::streaming::EventStream;

/// Result of parsing a whole export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedExport {
    /// Events in source order.
    pub events: Vec<ConversationEvent>,
    /// Resolved sender names, in order of first appearance.
    pub participants: Vec<String>,
}

impl ParsedExport {
    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if the export contained no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Computes the parse report for these events.
    pub fn summary(&self) -> ParseSummary {
        ParseSummary::from_events(&self.events)
    }
}

/// Parser for bracketed WhatsApp exports.
///
/// The parser holds only its configuration and can be reused across inputs.
#[derive(Debug, Clone, Default)]
pub struct ExportParser {
    config: ParserConfig,
}

impl ExportParser {
    /// Creates a parser with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses export text.
    ///
    /// Never fails: lines that are not headers become continuation lines,
    /// and unrecognised bodies become plain text.
    pub fn parse_str(&self, text: &str) -> ParsedExport {
        let mut assembler = EventAssembler::new(self.config.clone());
        let mut events = Vec::new();

        for line in text.lines() {
            events.extend(assembler.push_line(line));
        }
        events.extend(assembler.finish());

        tracing::debug!(
            lines = assembler.line_number(),
            events = events.len(),
            participants = assembler.participants().len(),
            "export parsed"
        );

        ParsedExport {
            events,
            participants: assembler.into_participants(),
        }
    }

    /// Parses raw export bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ChatpulseError::Decode`] if the bytes are not UTF-8. No
    /// events are produced in that case.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<ParsedExport> {
        let text = std::str::from_utf8(bytes).map_err(ChatpulseError::decode)?;
        Ok(self.parse_str(text))
    }

    /// Streams events from a reader.
    pub fn stream<R: BufRead>(&self, reader: R) -> EventStream<R> {
        EventStream::new(reader, self.config.clone())
    }

    /// Streams events from a reader of known size, enabling progress reports.
    pub fn stream_with_size<R: BufRead>(&self, reader: R, total_bytes: u64) -> EventStream<R> {
        self.stream(reader).with_total_bytes(total_bytes)
    }
}

/// Parses export text with the default configuration.
///
/// Shorthand for `ExportParser::new().parse_str(text)`.
pub fn parse_export(text: &str) -> ParsedExport {
    ExportParser::new().parse_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use crate::parsing::TimestampFormat;
    use std::io::Cursor;

    const EXPORT: &str = "\
[01/02/23, 10:00:00 AM] Family: \u{200e}Messages and calls are end-to-end encrypted.
[01/02/23, 10:00:15 AM] Alice: Hello
there
[01/02/23, 10:01:00 AM] Alice added Bob
[01/02/23, 10:02:00 AM] Bob: \u{200e}image omitted
[01/02/23, 10:03:00 AM] Bob: Missed voice call
[01/02/23, 10:04:00 AM] Alice: This message was deleted";

    #[test]
    fn test_parse_str() {
        let export = ExportParser::new().parse_str(EXPORT);
        assert_eq!(export.len(), 6);
        assert_eq!(export.participants, ["Alice", "Bob"]);
        assert!(matches!(export.events[0].kind, EventKind::System { .. }));
        assert_eq!(export.events[1].content(), "Hello\nthere");
        assert!(export.events[5].is_deleted());
    }

    #[test]
    fn test_parse_bytes_rejects_invalid_utf8() {
        let err = ExportParser::new()
            .parse_bytes(b"[01/02/23, 10:00:15 AM] Alice: \xff")
            .unwrap_err();
        assert!(err.is_decode());
        assert!(err.to_string().contains("unreadable export file"));
    }

    #[test]
    fn test_parse_bytes_accepts_bom() {
        let mut bytes = "\u{feff}".as_bytes().to_vec();
        bytes.extend_from_slice(b"[01/02/23, 10:00:15 AM] Alice: Hi");
        let export = ExportParser::new().parse_bytes(&bytes).unwrap();
        assert_eq!(export.participants, ["Alice"]);
    }

    #[test]
    fn test_stream_matches_parse_str() {
        let parser = ExportParser::new();
        let in_memory = parser.parse_str(EXPORT);

        let mut stream = parser.stream(Cursor::new(EXPORT));
        let streamed: Vec<_> = stream.by_ref().collect::<Result<_>>().unwrap();

        assert_eq!(streamed, in_memory.events);
        assert_eq!(stream.participants(), in_memory.participants.as_slice());
    }

    #[test]
    fn test_configured_format() {
        let config = ParserConfig::new().with_timestamp_format(TimestampFormat::DotDmyTwentyFourHour);
        let export = ExportParser::with_config(config).parse_str("[01.02.23, 22:00:15] Alice: Hi");
        assert_eq!(export.len(), 1);
        assert_eq!(export.events[0].timestamp.to_string(), "2023-02-01 22:00:15");
    }

    #[test]
    fn test_empty_input() {
        let export = parse_export("");
        assert!(export.is_empty());
        assert!(export.participants.is_empty());
    }

    #[test]
    fn test_summary_shortcut() {
        let export = parse_export(EXPORT);
        assert_eq!(export.summary().total_events, 6);
    }
}
