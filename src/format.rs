//! Output format selection.
//!
//! [`OutputFormat`] names a writer from [`core::output`](crate::core::output);
//! [`write_to_format`] and [`to_format_string`] dispatch on it. Formats whose
//! feature is disabled fail with [`ChatpulseError::InvalidFormat`].
//!
//! # Example
//!
//! ```rust
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn example() -> chatpulse::Result<()> {
//! use chatpulse::format::{OutputFormat, to_format_string};
//! use chatpulse::parse_export;
//!
//! let export = parse_export("[01/02/23, 10:00:15 AM] Alice: Hello");
//!
//! let format = OutputFormat::from_path("events.csv")?;
//! let csv = to_format_string(&export.events, format)?;
//! assert!(csv.contains("Alice;text;Hello"));
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ChatpulseError, Result};
use crate::event::ConversationEvent;

/// Output format for parsed events.
///
/// - [`Json`](OutputFormat::Json) - pretty array of tagged events (default)
/// - [`Jsonl`](OutputFormat::Jsonl) - one tagged event per line
/// - [`Csv`](OutputFormat::Csv) - one flat row per event, `;` delimited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    #[default]
    Json,
    /// Also known as NDJSON.
    Jsonl,
    Csv,
}

impl OutputFormat {
    /// Returns the file extension for this format (without dot).
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
            OutputFormat::Csv => "csv",
        }
    }

    /// Returns all accepted format names, aliases included.
    pub fn all_names() -> &'static [&'static str] {
        &["json", "jsonl", "ndjson", "csv"]
    }

    pub fn all() -> &'static [OutputFormat] {
        &[OutputFormat::Json, OutputFormat::Jsonl, OutputFormat::Csv]
    }

    /// Name of the cargo feature providing this format's writer.
    pub fn feature(self) -> &'static str {
        match self {
            OutputFormat::Json | OutputFormat::Jsonl => "json-output",
            OutputFormat::Csv => "csv-output",
        }
    }

    /// Detects the format from a file extension (case-insensitive).
    ///
    /// ```rust
    /// use chatpulse::format::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::from_path("out/events.NDJSON").unwrap(), OutputFormat::Jsonl);
    /// assert!(OutputFormat::from_path("events.txt").is_err());
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(ChatpulseError::invalid_format(
                "output",
                format!("Unknown file extension: '.{ext}'. Expected one of: json, jsonl, csv"),
            )),
        }
    }

    fn unavailable(self) -> ChatpulseError {
        ChatpulseError::invalid_format(
            "output",
            format!(
                "Output format {self} requires the '{}' feature to be enabled",
                self.feature()
            ),
        )
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Jsonl => write!(f, "JSONL"),
            OutputFormat::Csv => write!(f, "CSV"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ChatpulseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(ChatpulseError::invalid_format(
                "output",
                format!(
                    "Unknown format: '{s}'. Expected one of: {}",
                    OutputFormat::all_names().join(", ")
                ),
            )),
        }
    }
}

/// Writes events to a file in the specified format.
///
/// # Errors
///
/// Returns an error if:
/// - The required feature for the format is not enabled
/// - The file cannot be written
#[allow(unused_variables)]
pub fn write_to_format(
    events: &[ConversationEvent],
    path: impl AsRef<Path>,
    format: OutputFormat,
) -> Result<()> {
    match format {
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::write_json(events, path),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::core::output::write_jsonl(events, path),
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::write_csv(events, path),
        #[allow(unreachable_patterns)]
        _ => Err(format.unavailable()),
    }
}

/// Converts events to a string in the specified format.
#[allow(unused_variables)]
pub fn to_format_string(events: &[ConversationEvent], format: OutputFormat) -> Result<String> {
    match format {
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::to_json(events),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::core::output::to_jsonl(events),
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::to_csv(events),
        #[allow(unreachable_patterns)]
        _ => Err(format.unavailable()),
    }
}
