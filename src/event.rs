//! Typed conversation events produced by the export parser.
//!
//! Every header line of an export becomes one [`ConversationEvent`]: a
//! timestamp, an optional sender and an [`EventKind`] describing what
//! happened. Events are plain values; once the parser hands them out they
//! are never touched again.
//!
//! # Examples
//!
//! ```
//! use chatpulse::event::{ConversationEvent, EventKind};
//! use chrono::NaiveDate;
//!
//! let ts = NaiveDate::from_ymd_opt(2023, 2, 1)
//!     .unwrap()
//!     .and_hms_opt(10, 0, 15)
//!     .unwrap();
//!
//! let event = ConversationEvent::text(ts, "Alice", "Hello");
//! assert_eq!(event.sender(), Some("Alice"));
//! assert_eq!(event.content(), "Hello");
//! assert!(matches!(event.kind, EventKind::Text { is_deleted: false, .. }));
//! ```

use std::fmt;
use std::time::Duration;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Body stored on messages that were deleted by their sender.
pub const DELETED_BODY: &str = "This message was deleted";

/// One event of a conversation, in the order it appeared in the export.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `timestamp` | `NaiveDateTime` | Export-local time, second precision |
/// | `sender` | `Option<String>` | Display name after mapping; `None` for system notices |
/// | `kind` | [`EventKind`] | What the event is |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEvent {
    /// When the event happened, as printed in the export (no time zone).
    pub timestamp: NaiveDateTime,

    /// Resolved sender name. Absent for system notices.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub sender: Option<String>,

    /// The payload of the event.
    pub kind: EventKind,
}

/// The payload of a [`ConversationEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// A text message. Deleted messages carry [`DELETED_BODY`].
    Text {
        body: String,
        #[serde(default)]
        is_edited: bool,
        #[serde(default)]
        is_deleted: bool,
    },

    /// An attachment whose content was omitted from the export.
    Media {
        kind: MediaKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(default)]
        caption: Option<String>,
    },

    /// A voice or video call record. The initiator is the event's sender.
    Call {
        call_kind: CallKind,
        outcome: CallOutcome,
        #[serde(rename = "duration_secs")]
        #[serde(with = "duration_secs")]
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(default)]
        duration: Option<Duration>,
    },

    /// A notice not attributable to any participant (membership changes,
    /// encryption notices, ...).
    System { text: String },
}

/// Kind of omitted attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    Sticker,
    Gif,
    Document,
    /// Shared or live location.
    Location,
    /// Contact card.
    Contact,
}

/// Voice or video call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallKind {
    Voice,
    Video,
}

/// Whether a call connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallOutcome {
    Completed,
    Missed,
}

/// Flat, mutually exclusive category of an event.
///
/// Downstream statistics key off this label, so every event maps to exactly
/// one of them. Editing is orthogonal and tracked separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventLabel {
    Text,
    Deleted,
    Image,
    Video,
    Audio,
    Sticker,
    Gif,
    Document,
    Location,
    Contact,
    VoiceCall,
    VideoCall,
    MissedVoiceCall,
    MissedVideoCall,
    System,
}

impl ConversationEvent {
    /// Creates an event from its parts.
    pub fn new(timestamp: NaiveDateTime, sender: Option<String>, kind: EventKind) -> Self {
        Self {
            timestamp,
            sender,
            kind,
        }
    }

    /// Creates a plain text message.
    pub fn text(timestamp: NaiveDateTime, sender: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(
            timestamp,
            Some(sender.into()),
            EventKind::Text {
                body: body.into(),
                is_edited: false,
                is_deleted: false,
            },
        )
    }

    /// Creates a media message without caption.
    pub fn media(timestamp: NaiveDateTime, sender: impl Into<String>, kind: MediaKind) -> Self {
        Self::new(
            timestamp,
            Some(sender.into()),
            EventKind::Media {
                kind,
                caption: None,
            },
        )
    }

    /// Creates a call record initiated by `initiator`.
    pub fn call(
        timestamp: NaiveDateTime,
        initiator: impl Into<String>,
        call_kind: CallKind,
        outcome: CallOutcome,
        duration: Option<Duration>,
    ) -> Self {
        Self::new(
            timestamp,
            Some(initiator.into()),
            EventKind::Call {
                call_kind,
                outcome,
                duration,
            },
        )
    }

    /// Creates a system notice.
    pub fn system(timestamp: NaiveDateTime, text: impl Into<String>) -> Self {
        Self::new(timestamp, None, EventKind::System { text: text.into() })
    }

    /// Returns the sender, if any.
    pub fn sender(&self) -> Option<&str> {
        self.sender.as_deref()
    }

    /// Returns the call initiator for call events.
    pub fn initiator(&self) -> Option<&str> {
        match self.kind {
            EventKind::Call { .. } => self.sender(),
            _ => None,
        }
    }

    /// Returns the textual content of the event.
    ///
    /// Text body, media caption or notice text; empty for calls and
    /// uncaptioned media.
    pub fn content(&self) -> &str {
        match &self.kind {
            EventKind::Text { body, .. } => body,
            EventKind::Media { caption, .. } => caption.as_deref().unwrap_or(""),
            EventKind::Call { .. } => "",
            EventKind::System { text } => text,
        }
    }

    /// Returns `true` for text and media messages.
    pub fn is_message(&self) -> bool {
        matches!(self.kind, EventKind::Text { .. } | EventKind::Media { .. })
    }

    /// Returns `true` if the message was edited after sending.
    pub fn is_edited(&self) -> bool {
        matches!(self.kind, EventKind::Text { is_edited: true, .. })
    }

    /// Returns `true` if the message was deleted.
    pub fn is_deleted(&self) -> bool {
        matches!(self.kind, EventKind::Text { is_deleted: true, .. })
    }

    /// Returns the call duration for completed calls.
    pub fn call_duration(&self) -> Option<Duration> {
        match self.kind {
            EventKind::Call { duration, .. } => duration,
            _ => None,
        }
    }

    /// Returns the flat category of this event.
    pub fn label(&self) -> EventLabel {
        self.kind.label()
    }

    /// Appends a continuation line to the event's text.
    ///
    /// Returns `false` when the event has no text to extend (calls and
    /// deleted messages).
    pub(crate) fn push_continuation(&mut self, line: &str) -> bool {
        let target = match &mut self.kind {
            EventKind::Text {
                is_deleted: true, ..
            }
            | EventKind::Call { .. } => return false,
            EventKind::Text { body, .. } => body,
            EventKind::System { text } => text,
            EventKind::Media { caption, .. } => {
                let caption = caption.get_or_insert_with(String::new);
                if caption.is_empty() {
                    caption.push_str(line);
                    return true;
                }
                caption
            }
        };
        target.push('\n');
        target.push_str(line);
        true
    }

    /// Flags a text message as edited. No effect on other kinds.
    pub(crate) fn mark_edited(&mut self) {
        if let EventKind::Text { is_edited, .. } = &mut self.kind {
            *is_edited = true;
        }
    }
}

impl EventKind {
    /// Returns the flat category of this payload.
    pub fn label(&self) -> EventLabel {
        match self {
            EventKind::Text {
                is_deleted: true, ..
            } => EventLabel::Deleted,
            EventKind::Text { .. } => EventLabel::Text,
            EventKind::Media { kind, .. } => match kind {
                MediaKind::Image => EventLabel::Image,
                MediaKind::Video => EventLabel::Video,
                MediaKind::Audio => EventLabel::Audio,
                MediaKind::Sticker => EventLabel::Sticker,
                MediaKind::Gif => EventLabel::Gif,
                MediaKind::Document => EventLabel::Document,
                MediaKind::Location => EventLabel::Location,
                MediaKind::Contact => EventLabel::Contact,
            },
            EventKind::Call {
                call_kind, outcome, ..
            } => match (call_kind, outcome) {
                (CallKind::Voice, CallOutcome::Completed) => EventLabel::VoiceCall,
                (CallKind::Video, CallOutcome::Completed) => EventLabel::VideoCall,
                (CallKind::Voice, CallOutcome::Missed) => EventLabel::MissedVoiceCall,
                (CallKind::Video, CallOutcome::Missed) => EventLabel::MissedVideoCall,
            },
            EventKind::System { .. } => EventLabel::System,
        }
    }
}

impl EventLabel {
    /// Returns the snake_case name used in CSV output and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            EventLabel::Text => "text",
            EventLabel::Deleted => "deleted",
            EventLabel::Image => "image",
            EventLabel::Video => "video",
            EventLabel::Audio => "audio",
            EventLabel::Sticker => "sticker",
            EventLabel::Gif => "gif",
            EventLabel::Document => "document",
            EventLabel::Location => "location",
            EventLabel::Contact => "contact",
            EventLabel::VoiceCall => "voice_call",
            EventLabel::VideoCall => "video_call",
            EventLabel::MissedVoiceCall => "missed_voice_call",
            EventLabel::MissedVideoCall => "missed_video_call",
            EventLabel::System => "system",
        }
    }

    /// Returns `true` for call records, missed or not.
    pub fn is_call(self) -> bool {
        matches!(
            self,
            EventLabel::VoiceCall
                | EventLabel::VideoCall
                | EventLabel::MissedVoiceCall
                | EventLabel::MissedVideoCall
        )
    }
}

impl fmt::Display for EventLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Sticker => "sticker",
            MediaKind::Gif => "GIF",
            MediaKind::Document => "document",
            MediaKind::Location => "location",
            MediaKind::Contact => "contact card",
        };
        f.write_str(name)
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallKind::Voice => write!(f, "voice"),
            CallKind::Video => write!(f, "video"),
        }
    }
}

/// Serializes `Option<Duration>` as whole seconds.
mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
    }
}
