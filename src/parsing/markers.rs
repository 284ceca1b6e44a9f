//! Body classification by marker substrings.
//!
//! WhatsApp replaces attachments, calls and deletions with fixed phrases in
//! the exported body. [`RULES`] is the ordered table that turns a raw body
//! into an [`EventKind`]: rules run top to bottom and the first match wins.
//!
//! | # | Rule | Example body | Result |
//! |---|------|--------------|--------|
//! | 1 | `media` | `image omitted` | `Media { Image }` |
//! | 2 | `call` | `Missed video call` | `Call { Video, Missed }` |
//! | 3 | `deletion` | `This message was deleted` | `Text { is_deleted }` |
//! | 4 | `edited` | `ok <This message was edited>` | `Text { is_edited }` |
//! | 5 | `text` | anything else | `Text` |
//!
//! Matching is case-insensitive and runs on the body with directional marks
//! removed and whitespace (including no-break spaces) collapsed.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::event::{CallKind, CallOutcome, DELETED_BODY, EventKind, MediaKind};

/// Signature of a classification rule.
pub type Classifier = fn(&Body) -> Option<EventKind>;

/// One entry of the classification table.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub classify: Classifier,
}

/// Classification rules in priority order.
pub static RULES: &[Rule] = &[
    Rule {
        name: "media",
        classify: classify_media,
    },
    Rule {
        name: "call",
        classify: classify_call,
    },
    Rule {
        name: "deletion",
        classify: classify_deletion,
    },
    Rule {
        name: "edited",
        classify: classify_edited,
    },
    Rule {
        name: "text",
        classify: classify_text,
    },
];

/// Media markers, checked in order. The first one found in the body wins.
const MEDIA_MARKERS: &[(&str, MediaKind)] = &[
    ("image omitted", MediaKind::Image),
    ("video omitted", MediaKind::Video),
    ("audio omitted", MediaKind::Audio),
    ("sticker omitted", MediaKind::Sticker),
    ("gif omitted", MediaKind::Gif),
    ("document omitted", MediaKind::Document),
    ("contact card omitted", MediaKind::Contact),
    ("live location shared", MediaKind::Location),
];

/// Prefix of a shared (static) location, e.g. `Location: https://maps...`.
const LOCATION_PREFIX: &str = "location:";

const DELETION_MARKERS: &[&str] = &["this message was deleted", "you deleted this message"];

/// Phrases of notices that some exports attribute to the group name. Only
/// consulted when the body opens with the U+200E mark WhatsApp puts in front
/// of generated text.
const SYSTEM_NOTICE_MARKERS: &[&str] = &[
    "messages and calls are end-to-end encrypted",
    "security code changed",
    "created group",
    "created this group",
    "left the group",
    "changed the group",
    "changed the subject",
    "changed this group's icon",
    "joined using this group's invite link",
    "changed their phone number",
    "turned on disappearing messages",
    "turned off disappearing messages",
    "you're now an admin",
];

/// Anchored at the body start: a message that only mentions a call is text.
static CALL_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(missed|silenced) )?(?:group )?(voice|video) call(?:$|[,.])")
        .expect("call marker pattern is valid")
});

/// Notices recognizable from their shape alone. Anchored to the start or end
/// of the body so that a participant quoting one mid-sentence stays text.
static ANCHORED_NOTICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:messages and calls are end-to-end encrypted",
        r"|messages to this group are now secured with end-to-end encryption",
        r"|you['’]re now an admin\.?$)",
        r"|security code (?:with .+ )?changed\.?(?: tap to learn more\.?)?$",
    ))
    .expect("anchored notice pattern is valid")
});

/// Trailing `<This message was edited>` tag, tolerant of spacing inside it.
static EDITED_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<\s*this\s+message\s+was\s+edited\s*>\s*$")
        .expect("edited tag pattern is valid")
});

static CLOCK_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2}):(\d{2})(?::(\d{2}))?\b").expect("clock duration pattern is valid")
});

static WORD_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d+)\s*(hr|hour|min|sec)").expect("word duration pattern is valid")
});

/// A message body prepared for marker matching.
#[derive(Debug, Clone)]
pub struct Body {
    /// Body with directional marks removed, trimmed; otherwise untouched.
    text: String,
    /// `text` with every whitespace run collapsed to one space.
    normalized: String,
    /// ASCII-lowercased `normalized`; byte offsets match `normalized`.
    lower: String,
}

impl Body {
    pub fn new(raw: &str) -> Self {
        let text: String = raw.chars().filter(|&c| !is_invisible_mark(c)).collect();
        let text = text.trim().to_string();
        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let lower = normalized.to_ascii_lowercase();
        Self {
            text,
            normalized,
            lower,
        }
    }

    /// The trimmed body as it appeared in the export.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The whitespace-normalized body.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}

/// Classifies a raw header body into an event payload.
pub fn classify(raw: &str) -> EventKind {
    let body = Body::new(raw);
    classify_body(&body)
}

/// Runs [`RULES`] over a prepared body.
pub fn classify_body(body: &Body) -> EventKind {
    for rule in RULES {
        if let Some(kind) = (rule.classify)(body) {
            tracing::trace!(rule = rule.name, "body matched");
            return kind;
        }
    }
    // The last rule always matches; this is only reached if the table is edited.
    text_kind(body.text().to_string(), false)
}

/// Returns `true` if a body attributed to a sender label is really a notice
/// (encryption banner, membership change, ...).
///
/// A notice phrase counts anywhere in the body only when the raw body opens
/// with U+200E. Without the mark the body must have the fixed shape of a
/// banner or a security code notice.
pub fn is_system_notice(raw: &str) -> bool {
    let body = Body::new(raw);
    let marked = raw.trim_start().starts_with('\u{200e}');
    if marked
        && SYSTEM_NOTICE_MARKERS
            .iter()
            .any(|marker| body.lower.contains(marker))
    {
        return true;
    }
    ANCHORED_NOTICE.is_match(&body.lower)
}

fn classify_media(body: &Body) -> Option<EventKind> {
    let found = MEDIA_MARKERS
        .iter()
        .find_map(|&(marker, kind)| body.lower.find(marker).map(|pos| (kind, pos + marker.len())))
        .or_else(|| {
            body.lower
                .starts_with(LOCATION_PREFIX)
                .then_some((MediaKind::Location, LOCATION_PREFIX.len()))
        });

    let (kind, caption_start) = found?;
    let caption = strip_edited_tag(&body.normalized[caption_start..]);
    let caption = caption.trim();

    Some(EventKind::Media {
        kind,
        caption: (!caption.is_empty()).then(|| caption.to_string()),
    })
}

fn classify_call(body: &Body) -> Option<EventKind> {
    let caps = CALL_MARKER.captures(&body.lower)?;

    let call_kind = match caps.get(2).map(|m| m.as_str()) {
        Some("video") => CallKind::Video,
        _ => CallKind::Voice,
    };

    let missed = caps.get(1).is_some() || body.lower.contains("no answer");
    if missed {
        return Some(EventKind::Call {
            call_kind,
            outcome: CallOutcome::Missed,
            duration: None,
        });
    }

    let rest = &body.lower[caps.get(0).map_or(0, |m| m.end())..];
    Some(EventKind::Call {
        call_kind,
        outcome: CallOutcome::Completed,
        duration: parse_call_duration(rest),
    })
}

fn classify_deletion(body: &Body) -> Option<EventKind> {
    DELETION_MARKERS
        .iter()
        .any(|marker| body.lower.contains(marker))
        .then(|| EventKind::Text {
            body: DELETED_BODY.to_string(),
            is_edited: false,
            is_deleted: true,
        })
}

fn classify_edited(body: &Body) -> Option<EventKind> {
    let tag = EDITED_TAG.find(body.text())?;
    let text = body.text()[..tag.start()].trim_end();
    Some(text_kind(text.to_string(), true))
}

fn classify_text(body: &Body) -> Option<EventKind> {
    Some(text_kind(body.text().to_string(), false))
}

fn text_kind(body: String, is_edited: bool) -> EventKind {
    EventKind::Text {
        body,
        is_edited,
        is_deleted: false,
    }
}

/// Parses a call duration from `1:02:03`, `12:34` or `1 hr 2 min 3 sec`.
///
/// Zero-length durations count as unknown, and so do word durations that do
/// not fit in a `u64` of seconds.
pub fn parse_call_duration(text: &str) -> Option<Duration> {
    let seconds = match CLOCK_DURATION.captures(text) {
        Some(caps) => clock_seconds(&caps),
        None => word_seconds(&text.to_ascii_lowercase())?,
    };
    (seconds > 0).then(|| Duration::from_secs(seconds))
}

fn clock_seconds(caps: &regex::Captures<'_>) -> u64 {
    // Groups are at most two digits each.
    let part = |i: usize| -> u64 {
        caps.get(i)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };
    match caps.get(3) {
        Some(_) => part(1) * 3600 + part(2) * 60 + part(3),
        None => part(1) * 60 + part(2),
    }
}

fn word_seconds(text: &str) -> Option<u64> {
    WORD_DURATION.captures_iter(text).try_fold(0u64, |total, caps| {
        let value: u64 = caps[1].parse().ok()?;
        let unit = match &caps[2] {
            "hr" | "hour" => 3600,
            "min" => 60,
            _ => 1,
        };
        total.checked_add(value.checked_mul(unit)?)
    })
}

/// For the last line of a multi-line edited message: returns the line
/// without its trailing edit tag, or `None` if it carries none.
pub(crate) fn strip_trailing_edit_tag(line: &str) -> Option<&str> {
    let tag = EDITED_TAG.find(line)?;
    let rest = &line[..tag.start()];
    Some(rest.trim_end_matches(|c: char| c.is_whitespace() || is_invisible_mark(c)))
}

/// Removes a trailing `<This message was edited>` tag, case-insensitively.
fn strip_edited_tag(text: &str) -> &str {
    let trimmed = text.trim_end();
    EDITED_TAG
        .find(trimmed)
        .map_or(trimmed, |tag| &trimmed[..tag.start()])
}

fn is_invisible_mark(c: char) -> bool {
    matches!(c, '\u{200e}' | '\u{200f}' | '\u{feff}' | '\u{202a}'..='\u{202e}')
}
