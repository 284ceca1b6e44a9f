//! Unified error types for chatpulse.
//!
//! The parser itself has exactly one fatal failure: input that is not
//! decodable as UTF-8 text ([`ChatpulseError::Decode`]). Everything else a
//! chat export can throw at it (orphan lines, broken timestamps, unknown
//! markers) is absorbed line by line and never surfaces here.
//!
//! The remaining variants belong to the surfaces around the parser: reading
//! files, loading participant mappings and writing output.

use std::io;
use std::path::Path;
use std::str::Utf8Error;

use thiserror::Error;

/// A specialized [`Result`] type for chatpulse operations.
///
/// # Example
///
/// ```rust
/// use chatpulse::error::Result;
/// use chatpulse::ConversationEvent;
///
/// fn my_function() -> Result<Vec<ConversationEvent>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatpulseError>;

/// The error type for all chatpulse operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatpulseError {
    /// The export could not be decoded as UTF-8 text.
    ///
    /// This is the only error the parser reports. `line` is the 1-based
    /// line number when the failure was found while streaming.
    #[error("unreadable export file{}: {source}", .line.map(|l| format!(" (line {l})")).unwrap_or_default())]
    Decode {
        /// Line where decoding failed, if known
        line: Option<usize>,
        /// The underlying UTF-8 error
        #[source]
        source: Utf8Error,
    },

    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - The input file doesn't exist
    /// - Permission denied
    /// - Disk is full (when writing output)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A participant mapping entry or file is malformed.
    #[error("Invalid participant mapping '{entry}': {reason}")]
    InvalidMapping {
        /// The offending entry (or file path)
        entry: String,
        /// What is wrong with it
        reason: String,
    },

    /// A format name or file extension was not recognised.
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// What kind of format was expected (e.g. "output", "timestamp")
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error, or a mapping file that is not valid JSON.
    #[cfg(feature = "json-output")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatpulseError {
    /// Creates a decode error for a whole buffer.
    pub fn decode(source: Utf8Error) -> Self {
        ChatpulseError::Decode { line: None, source }
    }

    /// Creates a decode error for a specific 1-based line.
    pub fn decode_at(line: usize, source: Utf8Error) -> Self {
        ChatpulseError::Decode {
            line: Some(line),
            source,
        }
    }

    /// Creates an invalid mapping error.
    pub fn invalid_mapping(entry: impl Into<String>, reason: impl Into<String>) -> Self {
        ChatpulseError::InvalidMapping {
            entry: entry.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid mapping error pointing at a mapping file.
    pub fn invalid_mapping_file(path: &Path, reason: impl Into<String>) -> Self {
        ChatpulseError::InvalidMapping {
            entry: path.display().to_string(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        ChatpulseError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Returns `true` if the input could not be decoded as text.
    pub fn is_decode(&self) -> bool {
        matches!(self, ChatpulseError::Decode { .. })
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatpulseError::Io(_))
    }

    /// Returns `true` if this is a participant mapping error.
    pub fn is_invalid_mapping(&self) -> bool {
        matches!(self, ChatpulseError::InvalidMapping { .. })
    }

    /// Returns `true` if this is an invalid format error.
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, ChatpulseError::InvalidFormat { .. })
    }
}
