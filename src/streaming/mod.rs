//! Streaming parser for exports too large to hold in memory.
//!
//! [`EventStream`] reads any [`BufRead`](std::io::BufRead) one line at a time
//! and drives the same [`EventAssembler`](crate::parsing::EventAssembler) as
//! the in-memory parser, so both produce identical events.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::fs::File;
//! use std::io::BufReader;
//! use chatpulse::ExportParser;
//!
//! let file = File::open("WhatsApp Chat.txt")?;
//! let size = file.metadata()?.len();
//! let reader = BufReader::with_capacity(64 * 1024, file);
//!
//! for result in ExportParser::new().stream_with_size(reader, size) {
//!     let event = result?;
//!     println!("{} {}", event.timestamp, event.content());
//! }
//! # Ok::<(), chatpulse::ChatpulseError>(())
//! ```
//!
//! # Memory Usage
//!
//! | Approach | 100MB export | 1GB export |
//! |----------|--------------|------------|
//! | `parse_str` | whole text + all events | whole text + all events |
//! | `stream` | one line + one open event | one line + one open event |

mod event_stream;
mod traits;

pub use event_stream::EventStream;
pub use traits::EventIterator;
