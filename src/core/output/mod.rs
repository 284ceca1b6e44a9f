//! Output format writers.
//!
//! This module provides writers for different output formats:
//! - [`write_csv`] / [`to_csv`] - flat CSV with semicolon delimiter - requires `csv-output` feature
//! - [`write_json`] / [`to_json`] - JSON array of events - requires `json-output` feature
//! - [`write_jsonl`] / [`to_jsonl`] - JSON Lines, one event per line - requires `json-output` feature
//!
//! # Choosing a Format
//!
//! | Format | Shape | Use Case |
//! |--------|-------|----------|
//! | CSV | one flat [`EventRecord`] per row | spreadsheets, quick inspection |
//! | JSON | tagged events, full fidelity | APIs, further processing |
//! | JSONL | tagged events, one per line | streaming, large exports |
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn main() -> chatpulse::Result<()> {
//! use chatpulse::core::output::{to_csv, write_json, write_jsonl};
//! use chatpulse::parse_export;
//!
//! let export = parse_export("[01/02/23, 10:00:15 AM] Alice: Hello");
//!
//! write_json(&export.events, "events.json")?;
//! write_jsonl(&export.events, "events.jsonl")?;
//! let csv_string = to_csv(&export.events)?;
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "csv-output", feature = "json-output")))]
//! # fn main() {}
//! ```

#[cfg(feature = "csv-output")]
mod csv_writer;
#[cfg(feature = "json-output")]
mod json_writer;
#[cfg(feature = "json-output")]
mod jsonl_writer;

#[cfg(feature = "csv-output")]
pub use csv_writer::{CSV_HEADER, to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use json_writer::{to_json, write_json};
#[cfg(feature = "json-output")]
pub use jsonl_writer::{JsonlWriter, to_jsonl, write_jsonl};

use serde::Serialize;

use crate::event::ConversationEvent;

/// Timestamp layout used in flat records (ISO 8601, no zone).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// An event flattened to one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    pub timestamp: String,
    pub sender: String,
    /// [`EventLabel`](crate::EventLabel) name, e.g. `text` or `missed_voice_call`.
    pub event_type: &'static str,
    /// Body, caption or notice text.
    pub content: String,
    /// Call duration in seconds; empty when unknown.
    pub duration_secs: Option<u64>,
    pub edited: bool,
}

impl EventRecord {
    pub fn from_event(event: &ConversationEvent) -> Self {
        Self {
            timestamp: event.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            sender: event.sender().unwrap_or_default().to_string(),
            event_type: event.label().as_str(),
            content: event.content().to_string(),
            duration_secs: event.call_duration().map(|d| d.as_secs()),
            edited: event.is_edited(),
        }
    }
}
