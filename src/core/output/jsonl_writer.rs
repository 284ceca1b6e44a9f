//! JSON Lines (JSONL) output writer.
//!
//! JSONL is the format of choice for streaming: each event is written as
//! soon as it is parsed, so output never requires holding the whole export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::event::ConversationEvent;

/// Writes events one per line to any [`Write`] sink.
///
/// # Example
///
/// ```rust
/// use chatpulse::core::output::JsonlWriter;
/// use chatpulse::parse_export;
///
/// let export = parse_export("[01/02/23, 10:00:15 AM] Alice: Hello");
///
/// let mut writer = JsonlWriter::new(Vec::new());
/// for event in &export.events {
///     writer.write_event(event)?;
/// }
/// assert_eq!(writer.count(), 1);
/// let bytes = writer.into_inner()?;
/// assert!(String::from_utf8(bytes).unwrap().ends_with('\n'));
/// # Ok::<(), chatpulse::ChatpulseError>(())
/// ```
pub struct JsonlWriter<W: Write> {
    inner: BufWriter<W>,
    count: usize,
}

impl<W: Write> JsonlWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            inner: BufWriter::new(sink),
            count: 0,
        }
    }

    /// Serializes one event followed by a newline.
    pub fn write_event(&mut self, event: &ConversationEvent) -> Result<()> {
        serde_json::to_writer(&mut self.inner, event)?;
        self.inner.write_all(b"\n")?;
        self.count += 1;
        Ok(())
    }

    /// Number of events written.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Flushes and returns the underlying sink.
    pub fn into_inner(self) -> Result<W> {
        self.inner.into_inner().map_err(|e| e.into_error().into())
    }
}

/// Writes events to a JSONL (JSON Lines) file.
///
/// Each line is a valid JSON object:
/// ```jsonl
/// {"timestamp":"2023-02-01T10:00:15","sender":"Alice","kind":{"type":"text",...}}
/// {"timestamp":"2023-02-01T10:01:00","kind":{"type":"system","text":"Alice added Bob"}}
/// ```
pub fn write_jsonl(events: &[ConversationEvent], output_path: impl AsRef<Path>) -> Result<()> {
    let mut writer = JsonlWriter::new(File::create(output_path)?);
    for event in events {
        writer.write_event(event)?;
    }
    writer.into_inner()?;
    Ok(())
}

/// Converts events to a JSONL string.
pub fn to_jsonl(events: &[ConversationEvent]) -> Result<String> {
    let mut writer = JsonlWriter::new(Vec::new());
    for event in events {
        writer.write_event(event)?;
    }
    let bytes = writer.into_inner()?;
    // serde_json only emits UTF-8
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::io::{BufRead, BufReader};
    use tempfile::NamedTempFile;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 2, 1)
            .unwrap()
            .and_hms_opt(10, 0, 15)
            .unwrap()
    }

    #[test]
    fn test_write_jsonl_basic() {
        let events = vec![
            ConversationEvent::text(ts(), "Alice", "Hello\nthere"),
            ConversationEvent::system(ts(), "Alice added Bob"),
        ];

        let temp_file = NamedTempFile::new().unwrap();
        write_jsonl(&events, temp_file.path()).unwrap();

        let file = std::fs::File::open(temp_file.path()).unwrap();
        let lines: Vec<String> = BufReader::new(file).lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(first["sender"], "Alice");
        assert_eq!(first["kind"]["body"], "Hello\nthere");

        let second: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
        assert!(second.get("sender").is_none());
        assert_eq!(second["kind"]["type"], "system");
    }

    #[test]
    fn test_to_jsonl_no_array() {
        let events = vec![ConversationEvent::text(ts(), "Alice", "Hello")];
        let content = to_jsonl(&events).unwrap();
        assert!(!content.starts_with('['));
        assert_eq!(content.lines().count(), 1);
    }

    #[test]
    fn test_writer_counts_events() {
        let mut writer = JsonlWriter::new(Vec::new());
        writer.write_event(&ConversationEvent::text(ts(), "A", "1")).unwrap();
        writer.write_event(&ConversationEvent::text(ts(), "B", "2")).unwrap();
        assert_eq!(writer.count(), 2);
        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(out.lines().count(), 2);
    }
}
