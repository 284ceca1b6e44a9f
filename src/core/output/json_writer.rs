//! JSON output writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::event::ConversationEvent;

/// Writes events to a JSON file as a pretty-printed array.
///
/// # Format
/// ```json
/// [
///   {
///     "timestamp": "2023-02-01T10:00:15",
///     "sender": "Alice",
///     "kind": { "type": "text", "body": "Hello", "is_edited": false, "is_deleted": false }
///   }
/// ]
/// ```
pub fn write_json(events: &[ConversationEvent], output_path: impl AsRef<Path>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(output_path)?);
    serde_json::to_writer_pretty(&mut writer, events)?;
    writer.flush()?;
    Ok(())
}

/// Converts events to a JSON string as an array.
///
/// Same format as [`write_json`], but returns a String instead of writing to file.
pub fn to_json(events: &[ConversationEvent]) -> Result<String> {
    Ok(serde_json::to_string_pretty(events)?)
}
