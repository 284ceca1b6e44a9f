//! Timestamp conventions of bracketed WhatsApp exports.
//!
//! Exports vary by locale and app version. The parser does not guess: the
//! caller picks a [`TimestampFormat`] (default [`TimestampFormat::DmyTwelveHour`]),
//! or asks for [`TimestampFormat::detect`] explicitly.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ChatpulseError;

/// Supported header timestamp layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFormat {
    /// Day/month/year, 12-hour clock.
    /// Example: `[01/02/23, 10:00:15 AM]`
    #[default]
    DmyTwelveHour,
    /// Month/day/year, 12-hour clock (US locale).
    /// Example: `[2/1/23, 10:00:15 AM]`
    MdyTwelveHour,
    /// Day/month/year, 24-hour clock.
    /// Example: `[01/02/2023, 22:00:15]`
    DmyTwentyFourHour,
    /// Day.month.year, 24-hour clock.
    /// Example: `[01.02.23, 22:00:15]`
    DotDmyTwentyFourHour,
}

// Captures: 1 = date, 2 = time, 3 = everything after the closing bracket.
// A leading BOM or left-to-right mark is tolerated before the bracket.
static SLASH_TWELVE_HOUR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[\u{feff}\u{200e}]*\[(\d{1,2}/\d{1,2}/\d{2,4}),\s*(\d{1,2}:\d{2}(?::\d{2})?\s*[APap][Mm])\]\s?(.*)$",
    )
    .expect("12-hour header pattern is valid")
});

static SLASH_TWENTY_FOUR_HOUR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[\u{feff}\u{200e}]*\[(\d{1,2}/\d{1,2}/\d{2,4}),\s*(\d{1,2}:\d{2}(?::\d{2})?)\]\s?(.*)$",
    )
    .expect("24-hour header pattern is valid")
});

static DOT_TWENTY_FOUR_HOUR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[\u{feff}\u{200e}]*\[(\d{1,2}\.\d{1,2}\.\d{2,4}),\s*(\d{1,2}:\d{2}(?::\d{2})?)\]\s?(.*)$",
    )
    .expect("dotted header pattern is valid")
});

impl TimestampFormat {
    /// Returns all supported formats, in detection tie-break order.
    pub fn all() -> &'static [TimestampFormat] {
        &[
            TimestampFormat::DmyTwelveHour,
            TimestampFormat::MdyTwelveHour,
            TimestampFormat::DmyTwentyFourHour,
            TimestampFormat::DotDmyTwentyFourHour,
        ]
    }

    /// Returns the short names accepted by [`FromStr`].
    pub fn all_names() -> &'static [&'static str] {
        &["dmy12", "mdy12", "dmy24", "dot24"]
    }

    /// Returns the short name of this format.
    pub fn name(self) -> &'static str {
        match self {
            TimestampFormat::DmyTwelveHour => "dmy12",
            TimestampFormat::MdyTwelveHour => "mdy12",
            TimestampFormat::DmyTwentyFourHour => "dmy24",
            TimestampFormat::DotDmyTwentyFourHour => "dot24",
        }
    }

    /// Returns the compiled header pattern for this format.
    pub(crate) fn header_regex(self) -> &'static Regex {
        match self {
            TimestampFormat::DmyTwelveHour | TimestampFormat::MdyTwelveHour => &*SLASH_TWELVE_HOUR,
            TimestampFormat::DmyTwentyFourHour => &*SLASH_TWENTY_FOUR_HOUR,
            TimestampFormat::DotDmyTwentyFourHour => &*DOT_TWENTY_FOUR_HOUR,
        }
    }

    /// Returns chrono parse strings, two-digit years first.
    fn parse_formats(self) -> &'static [&'static str] {
        match self {
            TimestampFormat::DmyTwelveHour => &[
                "%d/%m/%y, %I:%M:%S %p",
                "%d/%m/%y, %I:%M %p",
                "%d/%m/%Y, %I:%M:%S %p",
                "%d/%m/%Y, %I:%M %p",
            ],
            TimestampFormat::MdyTwelveHour => &[
                "%m/%d/%y, %I:%M:%S %p",
                "%m/%d/%y, %I:%M %p",
                "%m/%d/%Y, %I:%M:%S %p",
                "%m/%d/%Y, %I:%M %p",
            ],
            TimestampFormat::DmyTwentyFourHour => &[
                "%d/%m/%y, %H:%M:%S",
                "%d/%m/%y, %H:%M",
                "%d/%m/%Y, %H:%M:%S",
                "%d/%m/%Y, %H:%M",
            ],
            TimestampFormat::DotDmyTwentyFourHour => &[
                "%d.%m.%y, %H:%M:%S",
                "%d.%m.%y, %H:%M",
                "%d.%m.%Y, %H:%M:%S",
                "%d.%m.%Y, %H:%M",
            ],
        }
    }

    /// Parses the date and time captured from a header line.
    ///
    /// Narrow and regular no-break spaces before the AM/PM marker are
    /// accepted. Returns `None` for impossible dates such as `31/02/23`.
    pub fn parse(self, date: &str, time: &str) -> Option<NaiveDateTime> {
        let time: String = time
            .chars()
            .map(|c| if c.is_whitespace() { ' ' } else { c })
            .collect();
        let combined = format!("{date}, {time}");

        self.parse_formats()
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(&combined, fmt).ok())
    }

    /// Parses a whole header line's timestamp, if the line is a header in
    /// this format.
    pub fn parse_line(self, line: &str) -> Option<NaiveDateTime> {
        let caps = self.header_regex().captures(line)?;
        self.parse(caps.get(1)?.as_str(), caps.get(2)?.as_str())
    }

    /// Picks the format under which the most sample lines parse as headers.
    ///
    /// Ties go to the earlier entry of [`TimestampFormat::all`]. Returns
    /// `None` if no line parses under any format.
    pub fn detect<S: AsRef<str>>(lines: &[S]) -> Option<TimestampFormat> {
        let mut best: Option<(TimestampFormat, usize)> = None;

        for &format in Self::all() {
            let score = lines
                .iter()
                .filter(|line| format.parse_line(line.as_ref()).is_some())
                .count();

            if score > 0 && best.is_none_or(|(_, top)| score > top) {
                best = Some((format, score));
            }
        }

        best.map(|(format, _)| format)
    }
}

impl fmt::Display for TimestampFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let example = match self {
            TimestampFormat::DmyTwelveHour => "DD/MM/YY, H:MM:SS AM/PM",
            TimestampFormat::MdyTwelveHour => "MM/DD/YY, H:MM:SS AM/PM",
            TimestampFormat::DmyTwentyFourHour => "DD/MM/YY, HH:MM:SS",
            TimestampFormat::DotDmyTwentyFourHour => "DD.MM.YY, HH:MM:SS",
        };
        f.write_str(example)
    }
}

impl FromStr for TimestampFormat {
    type Err = ChatpulseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dmy12" | "dmy" => Ok(TimestampFormat::DmyTwelveHour),
            "mdy12" | "us" => Ok(TimestampFormat::MdyTwelveHour),
            "dmy24" => Ok(TimestampFormat::DmyTwentyFourHour),
            "dot24" | "dot" => Ok(TimestampFormat::DotDmyTwentyFourHour),
            _ => Err(ChatpulseError::invalid_format(
                "timestamp",
                format!(
                    "Unknown timestamp format: '{}'. Expected one of: {}",
                    s,
                    Self::all_names().join(", ")
                ),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_parse_dmy_twelve_hour() {
        let ts = TimestampFormat::DmyTwelveHour.parse("01/02/23", "10:00:15 AM");
        assert_eq!(ts, Some(dt(2023, 2, 1, 10, 0, 15)));

        let ts = TimestampFormat::DmyTwelveHour.parse("01/02/23", "9:05:00 PM");
        assert_eq!(ts, Some(dt(2023, 2, 1, 21, 5, 0)));
    }

    #[test]
    fn test_parse_narrow_no_break_space() {
        let ts = TimestampFormat::DmyTwelveHour.parse("01/02/23", "10:00:15\u{202f}AM");
        assert_eq!(ts, Some(dt(2023, 2, 1, 10, 0, 15)));

        let ts = TimestampFormat::DmyTwelveHour.parse("01/02/23", "10:00:15\u{a0}PM");
        assert_eq!(ts, Some(dt(2023, 2, 1, 22, 0, 15)));
    }

    #[test]
    fn test_parse_four_digit_year() {
        let ts = TimestampFormat::DmyTwentyFourHour.parse("01/02/2023", "22:00:15");
        assert_eq!(ts, Some(dt(2023, 2, 1, 22, 0, 15)));
    }

    #[test]
    fn test_parse_mdy() {
        let ts = TimestampFormat::MdyTwelveHour.parse("2/1/23", "10:00:15 AM");
        assert_eq!(ts, Some(dt(2023, 2, 1, 10, 0, 15)));
    }

    #[test]
    fn test_parse_dot() {
        let ts = TimestampFormat::DotDmyTwentyFourHour.parse("15.01.24", "10:30:45");
        assert_eq!(ts, Some(dt(2024, 1, 15, 10, 30, 45)));
    }

    #[test]
    fn test_parse_impossible_date() {
        assert!(TimestampFormat::DmyTwelveHour.parse("31/02/23", "10:00:00 AM").is_none());
        assert!(TimestampFormat::DmyTwelveHour.parse("01/13/23", "10:00:00 AM").is_none());
    }

    #[test]
    fn test_parse_line() {
        let line = "[01/02/23, 10:00:15 AM] Alice: Hello";
        assert!(TimestampFormat::DmyTwelveHour.parse_line(line).is_some());
        assert!(TimestampFormat::DmyTwentyFourHour.parse_line(line).is_none());
        assert!(TimestampFormat::DmyTwelveHour.parse_line("Hello").is_none());
    }

    #[test]
    fn test_detect_prefers_parseable_format() {
        let lines = [
            "[1/15/24, 10:30:45 AM] Alice: Hello",
            "[1/16/24, 10:31:00 AM] Bob: Hi there",
        ];
        assert_eq!(
            TimestampFormat::detect(&lines),
            Some(TimestampFormat::MdyTwelveHour)
        );
    }

    #[test]
    fn test_detect_tie_goes_to_day_first() {
        let lines = ["[01/02/23, 10:00:15 AM] Alice: Hello"];
        assert_eq!(
            TimestampFormat::detect(&lines),
            Some(TimestampFormat::DmyTwelveHour)
        );
    }

    #[test]
    fn test_detect_dot_and_none() {
        let lines = ["[15.01.24, 10:30:45] Alice: Hello"];
        assert_eq!(
            TimestampFormat::detect(&lines),
            Some(TimestampFormat::DotDmyTwentyFourHour)
        );

        let junk = ["no timestamps", "here"];
        assert_eq!(TimestampFormat::detect(&junk), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "dmy12".parse::<TimestampFormat>().unwrap(),
            TimestampFormat::DmyTwelveHour
        );
        assert_eq!(
            "US".parse::<TimestampFormat>().unwrap(),
            TimestampFormat::MdyTwelveHour
        );
        assert!("iso".parse::<TimestampFormat>().unwrap_err().is_invalid_format());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&TimestampFormat::DotDmyTwentyFourHour).unwrap();
        assert_eq!(json, "\"dot_dmy_twenty_four_hour\"");
    }
}
