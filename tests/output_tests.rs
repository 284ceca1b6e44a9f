//! Tests for output writers (JSON, JSONL, CSV)

use std::fs;
use std::time::Duration;

use chatpulse::core::output::{CSV_HEADER, JsonlWriter, to_csv, to_json, to_jsonl, write_csv, write_json, write_jsonl};
use chatpulse::format::{OutputFormat, write_to_format};
use chatpulse::prelude::*;
use chrono::{NaiveDate, NaiveDateTime};
use tempfile::tempdir;

fn ts(min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 2, 1)
        .unwrap()
        .and_hms_opt(10, min, 0)
        .unwrap()
}

fn sample_events() -> Vec<ConversationEvent> {
    vec![
        ConversationEvent::system(ts(0), "Alice added Bob"),
        ConversationEvent::text(ts(1), "Alice", "Hello;\n\"friends\""),
        ConversationEvent::new(
            ts(2),
            Some("Bob".into()),
            EventKind::Text {
                body: "fixed typo".into(),
                is_edited: true,
                is_deleted: false,
            },
        ),
        ConversationEvent::new(
            ts(3),
            Some("Bob".into()),
            EventKind::Media {
                kind: MediaKind::Image,
                caption: Some("sunset".into()),
            },
        ),
        ConversationEvent::call(
            ts(4),
            "Alice",
            CallKind::Voice,
            CallOutcome::Completed,
            Some(Duration::from_secs(754)),
        ),
        ConversationEvent::call(ts(5), "Bob", CallKind::Video, CallOutcome::Missed, None),
    ]
}

// ============================================================================
// JSON Writer Tests
// ============================================================================

mod json_writer_tests {
    use super::*;

    #[test]
    fn test_write_json_basic() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("output.json");

        write_json(&sample_events(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        let array = parsed.as_array().unwrap();
        assert_eq!(array.len(), 6);

        assert_eq!(array[0]["timestamp"], "2023-02-01T10:00:00");
        assert!(array[0].get("sender").is_none());
        assert_eq!(array[0]["kind"]["type"], "system");

        assert_eq!(array[1]["sender"], "Alice");
        assert_eq!(array[1]["kind"]["type"], "text");
        assert_eq!(array[1]["kind"]["body"], "Hello;\n\"friends\"");

        assert_eq!(array[3]["kind"]["type"], "media");
        assert_eq!(array[3]["kind"]["kind"], "image");
        assert_eq!(array[3]["kind"]["caption"], "sunset");

        assert_eq!(array[4]["kind"]["type"], "call");
        assert_eq!(array[4]["kind"]["call_kind"], "voice");
        assert_eq!(array[4]["kind"]["outcome"], "completed");
        assert_eq!(array[4]["kind"]["duration_secs"], 754);

        assert!(array[5]["kind"].get("duration_secs").is_none());
    }

    #[test]
    fn test_json_reads_back() {
        let events = sample_events();
        let json = to_json(&events).unwrap();
        let back: Vec<ConversationEvent> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, events);
    }

    #[test]
    fn test_write_json_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.json");

        write_json(&[], &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "[]");
    }
}

// ============================================================================
// JSONL Writer Tests
// ============================================================================

mod jsonl_writer_tests {
    use super::*;

    #[test]
    fn test_write_jsonl_one_event_per_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("output.jsonl");

        write_jsonl(&sample_events(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 6);

        for line in &lines {
            let _: ConversationEvent = serde_json::from_str(line).unwrap();
        }
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["kind"]["body"], "Hello;\n\"friends\"");
    }

    #[test]
    fn test_incremental_writer_matches_batch() {
        let events = sample_events();

        let mut writer = JsonlWriter::new(Vec::new());
        for event in &events {
            writer.write_event(event).unwrap();
        }
        assert_eq!(writer.count(), events.len());

        let bytes = writer.into_inner().unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), to_jsonl(&events).unwrap());
    }

    #[test]
    fn test_to_jsonl_empty() {
        assert_eq!(to_jsonl(&[]).unwrap(), "");
    }
}

// ============================================================================
// CSV Writer Tests
// ============================================================================

mod csv_writer_tests {
    use super::*;

    fn read_rows(content: &str) -> Vec<csv::StringRecord> {
        csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .from_reader(content.as_bytes())
            .records()
            .map(|record| record.unwrap())
            .collect()
    }

    #[test]
    fn test_write_csv_header_and_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("output.csv");

        write_csv(&sample_events(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().next().unwrap(), CSV_HEADER.join(";"));

        let rows = read_rows(&content);
        assert_eq!(rows.len(), 6);

        assert_eq!(&rows[0][1], "");
        assert_eq!(&rows[0][2], "system");
        assert_eq!(&rows[0][3], "Alice added Bob");

        // Delimiters, quotes and newlines survive quoting
        assert_eq!(&rows[1][3], "Hello;\n\"friends\"");

        assert_eq!(&rows[2][5], "true");
        assert_eq!(&rows[3][2], "image");
        assert_eq!(&rows[3][3], "sunset");

        assert_eq!(&rows[4][0], "2023-02-01T10:04:00");
        assert_eq!(&rows[4][2], "voice_call");
        assert_eq!(&rows[4][4], "754");
        assert_eq!(&rows[5][2], "missed_video_call");
        assert_eq!(&rows[5][4], "");
    }

    #[test]
    fn test_to_csv_matches_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("output.csv");
        let events = sample_events();

        write_csv(&events, &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), to_csv(&events).unwrap());
    }

    #[test]
    fn test_csv_empty_has_header_only() {
        let csv = to_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }
}

// ============================================================================
// Format dispatch
// ============================================================================

#[test]
fn test_parsed_export_to_every_format() {
    let export = parse_export(
        "[01/02/23, 10:00:15 AM] Alice: Hello\nthere\n[01/02/23, 10:01:00 AM] Bob: \u{200e}audio omitted",
    );
    let dir = tempdir().unwrap();

    for &format in OutputFormat::all() {
        let path = dir.path().join(format!("events.{}", format.extension()));
        write_to_format(&export.events, &path, format).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("Alice"), "{format}");
        assert!(written.contains("audio"), "{format}");
    }
}

#[test]
fn test_write_into_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("events.json");

    let err = write_json(&sample_events(), &path).unwrap_err();
    assert!(err.is_io());
}
