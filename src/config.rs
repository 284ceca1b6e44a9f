//! Parser configuration.
//!
//! Everything that changes how an export is read lives in [`ParserConfig`]
//! and is handed to the parser explicitly. There is no global state.
//!
//! # Example
//!
//! ```rust
//! use chatpulse::config::{ParserConfig, ParticipantMap};
//! use chatpulse::parsing::TimestampFormat;
//!
//! let config = ParserConfig::new()
//!     .with_timestamp_format(TimestampFormat::MdyTwelveHour)
//!     .with_mapping("+44 7700 900123", "Alice")
//!     .with_skip_system_notices(true);
//!
//! assert_eq!(config.participants.resolve("+44 7700 900123"), "Alice");
//! ```

use std::collections::BTreeMap;
#[cfg(feature = "json-output")]
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ChatpulseError, Result};
use crate::parsing::TimestampFormat;

/// Explicit table of raw sender labels to display names.
///
/// Labels without an entry pass through unchanged. The JSON form is a plain
/// object: `{"+44 7700 900123": "Alice"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantMap {
    entries: BTreeMap<String, String>,
}

impl ParticipantMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, builder style.
    #[must_use]
    pub fn with(mut self, raw: impl Into<String>, display: impl Into<String>) -> Self {
        self.insert(raw, display);
        self
    }

    /// Adds or replaces an entry.
    pub fn insert(&mut self, raw: impl Into<String>, display: impl Into<String>) {
        self.entries.insert(raw.into(), display.into());
    }

    /// Returns the display name for `raw`, or `raw` itself when unmapped.
    pub fn resolve<'a>(&'a self, raw: &'a str) -> &'a str {
        self.entries.get(raw).map_or(raw, String::as_str)
    }

    /// Parses one `RAW=DISPLAY` entry, as given on the command line.
    ///
    /// The split happens at the last `=` so raw labels may contain one.
    pub fn parse_entry(entry: &str) -> Result<(String, String)> {
        let Some((raw, display)) = entry.rsplit_once('=') else {
            return Err(ChatpulseError::invalid_mapping(entry, "expected RAW=DISPLAY"));
        };
        let (raw, display) = (raw.trim(), display.trim());
        if raw.is_empty() {
            return Err(ChatpulseError::invalid_mapping(entry, "raw label is empty"));
        }
        if display.is_empty() {
            return Err(ChatpulseError::invalid_mapping(entry, "display name is empty"));
        }
        Ok((raw.to_string(), display.to_string()))
    }

    /// Parses a JSON object of `raw: display` pairs.
    #[cfg(feature = "json-output")]
    pub fn from_json_str(json: &str) -> Result<Self> {
        let map: Self = serde_json::from_str(json)?;
        if let Some((raw, _)) = map.entries.iter().find(|(_, display)| display.trim().is_empty()) {
            return Err(ChatpulseError::invalid_mapping(raw.clone(), "display name is empty"));
        }
        Ok(map)
    }

    /// Loads a mapping file (see [`from_json_str`](Self::from_json_str)).
    #[cfg(feature = "json-output")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content).map_err(|e| match e {
            ChatpulseError::Json(err) => ChatpulseError::invalid_mapping_file(path, err.to_string()),
            other => other,
        })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(raw, display)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParticipantMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Configuration for export parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Raw label to display name mapping (default: empty)
    pub participants: ParticipantMap,

    /// Header timestamp convention (default: `[DD/MM/YY, H:MM:SS AM/PM]`)
    pub timestamp_format: TimestampFormat,

    /// Treat known notices attributed to a group name as system notices
    /// (default: true)
    pub detect_system_notices: bool,

    /// Drop system notices from the output (default: false)
    pub skip_system_notices: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            participants: ParticipantMap::default(),
            timestamp_format: TimestampFormat::default(),
            detect_system_notices: true,
            skip_system_notices: false,
        }
    }
}

impl ParserConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the participant map.
    #[must_use]
    pub fn with_participants(mut self, participants: ParticipantMap) -> Self {
        self.participants = participants;
        self
    }

    /// Adds a single participant mapping.
    #[must_use]
    pub fn with_mapping(mut self, raw: impl Into<String>, display: impl Into<String>) -> Self {
        self.participants.insert(raw, display);
        self
    }

    /// Sets the header timestamp convention.
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Sets whether group-attributed notices are recognised.
    #[must_use]
    pub fn with_detect_system_notices(mut self, detect: bool) -> Self {
        self.detect_system_notices = detect;
        self
    }

    /// Sets whether system notices are dropped.
    #[must_use]
    pub fn with_skip_system_notices(mut self, skip: bool) -> Self {
        self.skip_system_notices = skip;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_config_default() {
        let config = ParserConfig::default();
        assert!(config.participants.is_empty());
        assert_eq!(config.timestamp_format, TimestampFormat::DmyTwelveHour);
        assert!(config.detect_system_notices);
        assert!(!config.skip_system_notices);
    }

    #[test]
    fn test_parser_config_builder() {
        let config = ParserConfig::new()
            .with_mapping("Al", "Alice")
            .with_timestamp_format(TimestampFormat::DmyTwentyFourHour)
            .with_detect_system_notices(false)
            .with_skip_system_notices(true);

        assert_eq!(config.participants.len(), 1);
        assert_eq!(config.timestamp_format, TimestampFormat::DmyTwentyFourHour);
        assert!(!config.detect_system_notices);
        assert!(config.skip_system_notices);
    }

    #[test]
    fn test_resolve_passes_unmapped_through() {
        let map = ParticipantMap::new().with("Al", "Alice");
        assert_eq!(map.resolve("Al"), "Alice");
        assert_eq!(map.resolve("Bob"), "Bob");
    }

    #[test]
    fn test_parse_entry() {
        assert_eq!(
            ParticipantMap::parse_entry("+1 555 0100 = Bob").unwrap(),
            ("+1 555 0100".to_string(), "Bob".to_string())
        );
        assert_eq!(
            ParticipantMap::parse_entry("a=b=Carol").unwrap(),
            ("a=b".to_string(), "Carol".to_string())
        );
    }

    #[test]
    fn test_parse_entry_errors() {
        assert!(ParticipantMap::parse_entry("Alice").unwrap_err().is_invalid_mapping());
        assert!(ParticipantMap::parse_entry("=Alice").unwrap_err().is_invalid_mapping());
        assert!(ParticipantMap::parse_entry("Al=").unwrap_err().is_invalid_mapping());
    }

    #[test]
    fn test_from_iterator() {
        let map: ParticipantMap = [("a", "A"), ("b", "B")].into_iter().collect();
        assert_eq!(map.len(), 2);
        assert_eq!(map.iter().next(), Some(("a", "A")));
    }

    #[cfg(feature = "json-output")]
    #[test]
    fn test_from_json_str() {
        let map = ParticipantMap::from_json_str(r#"{"+44 7700 900123": "Alice"}"#).unwrap();
        assert_eq!(map.resolve("+44 7700 900123"), "Alice");

        assert!(ParticipantMap::from_json_str("[1, 2]").is_err());
        assert!(
            ParticipantMap::from_json_str(r#"{"x": " "}"#)
                .unwrap_err()
                .is_invalid_mapping()
        );
    }

    #[cfg(feature = "json-output")]
    #[test]
    fn test_from_json_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"Al": "Alice"}}"#).unwrap();
        let map = ParticipantMap::from_json_file(file.path()).unwrap();
        assert_eq!(map.resolve("Al"), "Alice");

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        write!(bad, "not json").unwrap();
        assert!(
            ParticipantMap::from_json_file(bad.path())
                .unwrap_err()
                .is_invalid_mapping()
        );

        assert!(
            ParticipantMap::from_json_file("/nonexistent/map.json")
                .unwrap_err()
                .is_io()
        );
    }

    #[cfg(feature = "json-output")]
    #[test]
    fn test_config_serde() {
        let config = ParserConfig::new().with_mapping("Al", "Alice");
        let json = serde_json::to_string(&config).unwrap();
        let back: ParserConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);

        let partial: ParserConfig = serde_json::from_str(r#"{"skip_system_notices": true}"#).unwrap();
        assert!(partial.skip_system_notices);
        assert!(partial.detect_system_notices);
    }
}
