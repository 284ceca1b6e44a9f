//! CSV output writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::event::ConversationEvent;

use super::EventRecord;

/// Column names, in order.
pub const CSV_HEADER: [&str; 6] = ["Timestamp", "Sender", "Type", "Content", "Duration", "Edited"];

/// Writes events to a CSV file with semicolon delimiter.
///
/// # Format
/// - Delimiter: `;`
/// - Columns: `Timestamp`, `Sender`, `Type`, `Content`, `Duration`, `Edited`
/// - Encoding: UTF-8
/// - Multi-line content is quoted, not split
pub fn write_csv(events: &[ConversationEvent], output_path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(output_path)?;
    write_records(events, file)
}

/// Converts events to a CSV string.
///
/// Same format as [`write_csv`], but returns a String instead of writing to file.
pub fn to_csv(events: &[ConversationEvent]) -> Result<String> {
    let mut buffer = Vec::new();
    write_records(events, &mut buffer)?;
    // records are built from `&str` fields only
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn write_records<W: Write>(events: &[ConversationEvent], sink: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(sink);

    writer.write_record(CSV_HEADER)?;

    for event in events {
        let record = EventRecord::from_event(event);
        let duration = record.duration_secs.map(|s| s.to_string()).unwrap_or_default();
        writer.write_record([
            record.timestamp.as_str(),
            record.sender.as_str(),
            record.event_type,
            record.content.as_str(),
            duration.as_str(),
            if record.edited { "true" } else { "false" },
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventKind, MediaKind};
    use chrono::{NaiveDate, NaiveDateTime};
    use tempfile::NamedTempFile;

    fn ts(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 2, 1)
            .unwrap()
            .and_hms_opt(10, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_to_csv_basic() {
        let events = vec![
            ConversationEvent::text(ts(0), "Alice", "Hello"),
            ConversationEvent::media(ts(1), "Bob", MediaKind::Sticker),
        ];

        let csv = to_csv(&events).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Timestamp;Sender;Type;Content;Duration;Edited"));
        assert_eq!(lines.next(), Some("2023-02-01T10:00:00;Alice;text;Hello;;false"));
        assert_eq!(lines.next(), Some("2023-02-01T10:01:00;Bob;sticker;;;false"));
    }

    #[test]
    fn test_multiline_content_is_quoted() {
        let events = vec![ConversationEvent::text(ts(0), "Alice", "line one\nline; two")];
        let csv = to_csv(&events).unwrap();
        assert!(csv.contains("\"line one\nline; two\""));
    }

    #[test]
    fn test_edited_flag() {
        let event = ConversationEvent::new(
            ts(0),
            Some("Alice".into()),
            EventKind::Text {
                body: "fixed".into(),
                is_edited: true,
                is_deleted: false,
            },
        );
        let csv = to_csv(&[event]).unwrap();
        assert!(csv.contains(";text;fixed;;true"));
    }

    #[test]
    fn test_write_csv_file() {
        let events = vec![ConversationEvent::text(ts(0), "Alice", "Hello")];
        let temp_file = NamedTempFile::new().unwrap();

        write_csv(&events, temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.starts_with("Timestamp;Sender;Type"));
        assert!(content.contains("Alice;text;Hello"));
    }

    #[test]
    fn test_empty_events_writes_header_only() {
        let csv = to_csv(&[]).unwrap();
        assert_eq!(csv.trim_end(), "Timestamp;Sender;Type;Content;Duration;Edited");
    }
}
