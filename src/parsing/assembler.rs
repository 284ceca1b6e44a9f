//! Line-by-line event assembly.
//!
//! [`EventAssembler`] is the state machine behind both the in-memory parser
//! and [`EventStream`](crate::streaming::EventStream). It holds at most one
//! open event: a header line closes the open event and starts a new one,
//! a continuation line extends it.

use std::collections::HashSet;

use crate::config::ParserConfig;
use crate::event::{ConversationEvent, EventKind};

use super::header::{HeaderLine, LineClass, classify_line};
use super::markers::{self, Body};

/// Builds [`ConversationEvent`]s from physical lines.
///
/// Lines must be passed without their terminator (`\n` or `\r\n`).
///
/// # Example
///
/// ```rust
/// use chatpulse::config::ParserConfig;
/// use chatpulse::parsing::EventAssembler;
///
/// let mut assembler = EventAssembler::new(ParserConfig::default());
/// assert!(assembler.push_line("[01/02/23, 10:00:15 AM] Alice: Hello").is_none());
/// assert!(assembler.push_line("there").is_none());
///
/// let event = assembler.finish().unwrap();
/// assert_eq!(event.content(), "Hello\nthere");
/// assert_eq!(assembler.participants(), ["Alice"]);
/// ```
#[derive(Debug, Clone)]
pub struct EventAssembler {
    config: ParserConfig,
    pending: Option<ConversationEvent>,
    participants: Vec<String>,
    seen: HashSet<String>,
    line_number: usize,
}

impl EventAssembler {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            pending: None,
            participants: Vec::new(),
            seen: HashSet::new(),
            line_number: 0,
        }
    }

    /// Feeds one line. Returns the previously open event when this line
    /// closes it.
    pub fn push_line(&mut self, line: &str) -> Option<ConversationEvent> {
        self.line_number += 1;

        match classify_line(line, self.config.timestamp_format) {
            LineClass::Header(header) => {
                let event = self.open_event(&header);
                let closed = self.pending.replace(event);
                closed.and_then(|e| self.emit(e))
            }
            LineClass::Continuation => {
                self.extend_event(line);
                None
            }
        }
    }

    /// Closes and returns the open event, if any. Call once at end of input.
    pub fn finish(&mut self) -> Option<ConversationEvent> {
        self.pending.take().and_then(|e| self.emit(e))
    }

    /// Participants seen so far, in order of first appearance.
    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    pub fn into_participants(self) -> Vec<String> {
        self.participants
    }

    /// Number of lines fed so far.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    fn open_event(&mut self, header: &HeaderLine<'_>) -> ConversationEvent {
        let Some(label) = header.sender else {
            return ConversationEvent::system(header.timestamp, Body::new(header.body).text());
        };

        if self.config.detect_system_notices && markers::is_system_notice(header.body) {
            tracing::debug!(
                line = self.line_number,
                label,
                "notice attributed to a sender label, treating as system notice"
            );
            return ConversationEvent::system(header.timestamp, Body::new(header.body).text());
        }

        let sender = self.config.participants.resolve(label).to_string();
        self.register(&sender);

        ConversationEvent::new(header.timestamp, Some(sender), markers::classify(header.body))
    }

    fn extend_event(&mut self, line: &str) {
        let Some(event) = self.pending.as_mut() else {
            tracing::debug!(line = self.line_number, "continuation line before any header, dropped");
            return;
        };

        if let EventKind::Text {
            is_deleted: false, ..
        } = event.kind
        {
            if let Some(stripped) = markers::strip_trailing_edit_tag(line) {
                event.push_continuation(stripped);
                event.mark_edited();
                return;
            }
        }

        if !event.push_continuation(line) {
            tracing::debug!(
                line = self.line_number,
                kind = %event.label(),
                "continuation line has no text to attach to, dropped"
            );
        }
    }

    fn register(&mut self, sender: &str) {
        if !self.seen.contains(sender) {
            self.seen.insert(sender.to_string());
            self.participants.push(sender.to_string());
        }
    }

    fn emit(&self, event: ConversationEvent) -> Option<ConversationEvent> {
        if self.config.skip_system_notices && matches!(event.kind, EventKind::System { .. }) {
            tracing::trace!("system notice skipped");
            return None;
        }
        Some(event)
    }
}
