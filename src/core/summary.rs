//! Parse report over an event sequence.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::event::{ConversationEvent, EventLabel};

/// Counts computed in a single pass over parsed events.
///
/// # Example
///
/// ```rust
/// use chatpulse::core::ParseSummary;
/// use chatpulse::{EventLabel, parse_export};
///
/// let export = parse_export(
///     "[01/02/23, 10:00:15 AM] Alice: Hello\n\
///      [01/02/23, 10:01:00 AM] Bob: \u{200e}image omitted",
/// );
/// let summary = ParseSummary::from_events(&export.events);
///
/// assert_eq!(summary.total_events, 2);
/// assert_eq!(summary.count(EventLabel::Image), 1);
/// assert_eq!(summary.by_sender, [("Alice".to_string(), 1), ("Bob".to_string(), 1)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseSummary {
    pub total_events: usize,
    /// Events per label, in label order. Labels that never occur are absent.
    pub by_label: BTreeMap<EventLabel, usize>,
    /// Text messages carrying the edit tag.
    pub edited: usize,
    /// Events per sender, in order of first appearance.
    pub by_sender: Vec<(String, usize)>,
    /// Sum of known durations of completed calls.
    #[serde(serialize_with = "serialize_secs")]
    pub total_call_time: Duration,
    pub first: Option<NaiveDateTime>,
    pub last: Option<NaiveDateTime>,
}

impl ParseSummary {
    pub fn from_events(events: &[ConversationEvent]) -> Self {
        let mut summary = Self::default();
        for event in events {
            summary.add(event);
        }
        summary
    }

    /// Folds one more event into the counts. Events must arrive in order.
    pub fn add(&mut self, event: &ConversationEvent) {
        self.total_events += 1;
        *self.by_label.entry(event.label()).or_insert(0) += 1;

        if event.is_edited() {
            self.edited += 1;
        }
        if let Some(duration) = event.call_duration() {
            self.total_call_time = self.total_call_time.saturating_add(duration);
        }
        if let Some(sender) = event.sender() {
            match self.by_sender.iter_mut().find(|(name, _)| name == sender) {
                Some((_, count)) => *count += 1,
                None => self.by_sender.push((sender.to_string(), 1)),
            }
        }

        self.first.get_or_insert(event.timestamp);
        self.last = Some(event.timestamp);
    }

    /// Number of events with the given label.
    pub fn count(&self, label: EventLabel) -> usize {
        self.by_label.get(&label).copied().unwrap_or(0)
    }

    /// Number of text and media messages (deleted ones included).
    pub fn message_count(&self) -> usize {
        self.by_label
            .iter()
            .filter(|(label, _)| !label.is_call() && **label != EventLabel::System)
            .map(|(_, count)| count)
            .sum()
    }

    /// Number of call records, missed ones included.
    pub fn call_count(&self) -> usize {
        self.by_label
            .iter()
            .filter(|(label, _)| label.is_call())
            .map(|(_, count)| count)
            .sum()
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_secs<S: serde::Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(value.as_secs())
}

impl fmt::Display for ParseSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total events: {}", self.total_events)?;

        let names: Vec<&str> = self.by_sender.iter().map(|(name, _)| name.as_str()).collect();
        writeln!(f, "Participants: {}", names.join(", "))?;

        if !self.by_label.is_empty() {
            writeln!(f, "\nEvent types:")?;
            for (label, count) in &self.by_label {
                writeln!(f, "  {label}: {count}")?;
            }
        }
        if self.edited > 0 {
            writeln!(f, "  edited: {}", self.edited)?;
        }

        if !self.total_call_time.is_zero() {
            let secs = self.total_call_time.as_secs();
            writeln!(
                f,
                "\nCall time: {}:{:02}:{:02}",
                secs / 3600,
                (secs % 3600) / 60,
                secs % 60
            )?;
        }

        if let (Some(first), Some(last)) = (self.first, self.last) {
            writeln!(f, "\nDate range: {} to {}", first.date(), last.date())?;
        }
        Ok(())
    }
}
