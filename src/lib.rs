//! # Chatpulse
//!
//! A Rust library for turning plain-text WhatsApp conversation exports into
//! an ordered stream of typed conversation events.
//!
//! ## Overview
//!
//! A WhatsApp export is a text file where each message starts with a
//! bracketed timestamp and may continue over several lines:
//!
//! ```text
//! [01/02/23, 10:00:15 AM] Alice: Hello
//! there
//! [01/02/23, 10:01:00 AM] Alice added Bob
//! [01/02/23, 10:02:00 AM] Bob: ‎image omitted
//! [01/02/23, 10:03:00 AM] Bob: Missed voice call
//! ```
//!
//! Chatpulse classifies every line, joins continuation lines onto the event
//! they belong to and recognises the markers WhatsApp substitutes for media,
//! calls, deletions and edits. The result is a list of
//! [`ConversationEvent`]s plus the participants, in order of first
//! appearance.
//!
//! ## Quick Start
//!
//! ```rust
//! use chatpulse::prelude::*;
//!
//! let text = "[01/02/23, 10:00:15 AM] Alice: Hello\nthere\n\
//!             [01/02/23, 10:03:00 AM] Bob: Missed voice call";
//!
//! let export = ExportParser::new().parse_str(text);
//!
//! assert_eq!(export.participants, ["Alice", "Bob"]);
//! assert_eq!(export.events[0].content(), "Hello\nthere");
//! assert_eq!(export.events[1].label(), EventLabel::MissedVoiceCall);
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use chatpulse::prelude::*;
//!
//! let config = ParserConfig::new()
//!     .with_timestamp_format(TimestampFormat::MdyTwelveHour)
//!     .with_mapping("+1 555 0100", "Bob");
//!
//! let export = ExportParser::with_config(config)
//!     .parse_str("[2/13/23, 9:00:00 PM] +1 555 0100: hi");
//!
//! assert_eq!(export.events[0].sender(), Some("Bob"));
//! ```
//!
//! ## Streaming for Large Files
//!
//! ```rust,no_run
//! use std::fs::File;
//! use std::io::BufReader;
//! use chatpulse::ExportParser;
//!
//! let reader = BufReader::new(File::open("WhatsApp Chat.txt")?);
//! for result in ExportParser::new().stream(reader) {
//!     let event = result?;
//!     println!("{:?}", event.label());
//! }
//! # Ok::<(), chatpulse::ChatpulseError>(())
//! ```
//!
//! ## Module Structure
//!
//! - [`parser`] - [`ExportParser`], [`ParsedExport`], [`parse_export`]
//! - [`event`] - [`ConversationEvent`], [`EventKind`] and friends
//! - [`parsing`] - timestamp formats, line classification, marker rules
//! - [`streaming`] - [`EventStream`](streaming::EventStream) over any `BufRead`
//! - [`config`] - [`ParserConfig`], [`ParticipantMap`]
//! - [`core`] - [`ParseSummary`](core::ParseSummary) and output writers
//! - [`format`] - [`OutputFormat`](format::OutputFormat) dispatch
//! - [`cli`] - CLI arguments and logging setup (feature `cli`)
//! - [`error`] - [`ChatpulseError`], [`Result`]
//! - [`prelude`] - Convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod event;
pub mod format;
pub mod parser;
pub mod parsing;
pub mod streaming;

// Re-export the main types at the crate root for convenience
pub use config::{ParserConfig, ParticipantMap};
pub use error::{ChatpulseError, Result};
pub use event::{
    CallKind, CallOutcome, ConversationEvent, DELETED_BODY, EventKind, EventLabel, MediaKind,
};
pub use parser::{ExportParser, ParsedExport, parse_export};

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use chatpulse::prelude::*;
/// ```
pub mod prelude {
    // Events
    pub use crate::event::{
        CallKind, CallOutcome, ConversationEvent, DELETED_BODY, EventKind, EventLabel, MediaKind,
    };

    // Error types
    pub use crate::error::{ChatpulseError, Result};

    // Parsing
    pub use crate::parser::{ExportParser, ParsedExport, parse_export};
    pub use crate::parsing::TimestampFormat;
    pub use crate::streaming::{EventIterator, EventStream};

    // Configuration
    pub use crate::config::{ParserConfig, ParticipantMap};

    // Processing
    pub use crate::core::ParseSummary;

    // Output (file writers and string converters)
    #[cfg(feature = "csv-output")]
    pub use crate::core::output::{to_csv, write_csv};
    #[cfg(feature = "json-output")]
    pub use crate::core::output::{to_json, to_jsonl, write_json, write_jsonl};
    pub use crate::format::{OutputFormat, to_format_string, write_to_format};
}
