//! Line-at-a-time parsing from any [`BufRead`].

use std::collections::VecDeque;
use std::io::BufRead;

use crate::config::ParserConfig;
use crate::error::{ChatpulseError, Result};
use crate::event::ConversationEvent;
use crate::parsing::EventAssembler;

use super::EventIterator;

/// Streaming counterpart of [`ExportParser::parse_str`](crate::ExportParser::parse_str).
///
/// Reads one line at a time, so memory use is bounded by the longest event
/// rather than the export. Yields exactly the events the in-memory parser
/// yields for the same text.
///
/// A line that is not valid UTF-8 yields [`ChatpulseError::Decode`] with its
/// line number, and the stream ends there. Read errors end it the same way.
pub struct EventStream<R: BufRead> {
    reader: R,
    assembler: EventAssembler,
    buf: Vec<u8>,
    queued: VecDeque<ConversationEvent>,
    bytes_read: u64,
    total_bytes: Option<u64>,
    finished: bool,
}

impl<R: BufRead> EventStream<R> {
    pub fn new(reader: R, config: ParserConfig) -> Self {
        Self {
            reader,
            assembler: EventAssembler::new(config),
            buf: Vec::with_capacity(4096),
            queued: VecDeque::new(),
            bytes_read: 0,
            total_bytes: None,
            finished: false,
        }
    }

    /// Sets the input size used for [`progress`](EventIterator::progress).
    #[must_use]
    pub fn with_total_bytes(mut self, total: u64) -> Self {
        self.total_bytes = Some(total);
        self
    }

    /// Participants seen so far, in order of first appearance.
    ///
    /// Complete once the stream is exhausted.
    pub fn participants(&self) -> &[String] {
        self.assembler.participants()
    }

    /// Consumes the stream, returning the participants seen.
    pub fn into_participants(self) -> Vec<String> {
        self.assembler.into_participants()
    }

    /// Reads the next line into the assembler. Returns `Ok(false)` at EOF.
    fn advance(&mut self) -> Result<bool> {
        self.buf.clear();
        let read = self.reader.read_until(b'\n', &mut self.buf)?;
        if read == 0 {
            return Ok(false);
        }
        self.bytes_read += read as u64;

        let mut line = self.buf.as_slice();
        if let Some(rest) = line.strip_suffix(b"\n") {
            line = rest.strip_suffix(b"\r").unwrap_or(rest);
        }

        let line_number = self.assembler.line_number() + 1;
        let line = std::str::from_utf8(line).map_err(|e| ChatpulseError::decode_at(line_number, e))?;

        if let Some(event) = self.assembler.push_line(line) {
            self.queued.push_back(event);
        }
        Ok(true)
    }
}

impl<R: BufRead> Iterator for EventStream<R> {
    type Item = Result<ConversationEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.queued.pop_front() {
                return Some(Ok(event));
            }
            if self.finished {
                return None;
            }

            match self.advance() {
                Ok(true) => {}
                Ok(false) => {
                    self.finished = true;
                    if let Some(event) = self.assembler.finish() {
                        return Some(Ok(event));
                    }
                }
                Err(e) => {
                    tracing::debug!(error = %e, "stream aborted");
                    self.finished = true;
                    self.queued.clear();
                    return Some(Err(e));
                }
            }
        }
    }
}

impl<R: BufRead> EventIterator for EventStream<R> {
    fn progress(&self) -> Option<f64> {
        match self.total_bytes {
            Some(0) | None => None,
            Some(total) => Some((self.bytes_read as f64 / total as f64) * 100.0),
        }
    }

    fn bytes_processed(&self) -> u64 {
        self.bytes_read
    }

    fn total_bytes(&self) -> Option<u64> {
        self.total_bytes
    }
}
