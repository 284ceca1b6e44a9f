//! Progress reporting for streaming iterators.

use crate::error::Result;
use crate::event::ConversationEvent;

/// Iterator over events with progress tracking.
///
/// Extends the standard [`Iterator`] trait with methods for monitoring
/// parsing progress, useful for progress output and logging.
///
/// # Object Safety
///
/// This trait is object-safe, enabling dynamic dispatch via `Box<dyn EventIterator>`.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use chatpulse::ExportParser;
/// use chatpulse::streaming::EventIterator;
///
/// let text = "[01/02/23, 10:00:15 AM] Alice: Hello\n";
/// let mut iter = ExportParser::new().stream_with_size(Cursor::new(text), text.len() as u64);
///
/// while let Some(result) = iter.next() {
///     let _event = result?;
/// }
/// assert_eq!(iter.progress(), Some(100.0));
/// # Ok::<(), chatpulse::ChatpulseError>(())
/// ```
pub trait EventIterator: Iterator<Item = Result<ConversationEvent>> {
    /// Returns approximate progress as a percentage (0.0 to 100.0).
    ///
    /// Returns `None` if progress cannot be determined (unknown input size).
    fn progress(&self) -> Option<f64> {
        None
    }

    /// Returns the number of bytes processed so far.
    fn bytes_processed(&self) -> u64;

    /// Returns the total input size in bytes, if known.
    fn total_bytes(&self) -> Option<u64> {
        None
    }
}
