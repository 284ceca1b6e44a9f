//! Header vs. continuation line classification.
//!
//! A header line opens a new event:
//!
//! ```text
//! [01/02/23, 10:00:15 AM] Alice: Hello        <- message header
//! [01/02/23, 10:01:00 AM] Alice added Bob     <- system notice header
//! there                                        <- continuation
//! ```
//!
//! Anything that is not a well-formed header, including a header whose
//! timestamp does not exist on the calendar, is a continuation line.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use super::timestamp::TimestampFormat;

// `Sender: body`; the sender runs up to the first colon that is followed by
// whitespace or the end of the line.
static SENDER_SPLIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^:]+?):(?:\s(.*))?$").expect("sender pattern is valid")
});

/// A parsed header line, borrowing from the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLine<'a> {
    pub timestamp: NaiveDateTime,
    /// Raw sender label, before participant mapping.
    pub sender: Option<&'a str>,
    /// Raw body text after the `Sender: ` prefix (or the whole notice).
    pub body: &'a str,
}

/// Outcome of classifying one physical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass<'a> {
    Header(HeaderLine<'a>),
    Continuation,
}

/// Classifies a line under the given timestamp format.
pub fn classify_line(line: &str, format: TimestampFormat) -> LineClass<'_> {
    let Some(caps) = format.header_regex().captures(line) else {
        return LineClass::Continuation;
    };

    let (Some(date), Some(time), Some(rest)) = (caps.get(1), caps.get(2), caps.get(3)) else {
        return LineClass::Continuation;
    };

    let Some(timestamp) = format.parse(date.as_str(), time.as_str()) else {
        tracing::debug!(
            date = date.as_str(),
            time = time.as_str(),
            "header timestamp does not parse, treating line as continuation"
        );
        return LineClass::Continuation;
    };

    let rest = rest.as_str();
    let (sender, body) = split_sender(rest);

    LineClass::Header(HeaderLine {
        timestamp,
        sender,
        body,
    })
}

/// Splits `Sender: body` into its parts. Lines without a sender prefix are
/// returned whole as the body.
fn split_sender(rest: &str) -> (Option<&str>, &str) {
    if let Some(caps) = SENDER_SPLIT.captures(rest) {
        if let Some(sender) = caps.get(1) {
            let label = clean_label(sender.as_str());
            if !label.is_empty() {
                let body = caps.get(2).map_or("", |m| m.as_str());
                return (Some(label), body);
            }
        }
    }
    (None, rest)
}

/// Trims whitespace and directional marks around a sender label.
fn clean_label(label: &str) -> &str {
    label.trim_matches(|c: char| c.is_whitespace() || matches!(c, '\u{200e}' | '\u{200f}' | '\u{202a}'..='\u{202e}'))
}
