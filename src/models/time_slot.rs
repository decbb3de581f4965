//! Weekly time slots.
//!
//! A `TimeSlot` is one recurring weekly meeting: a list of weekday tokens
//! plus a wall-clock `[start, end)` range. Slots keep their textual form
//! (as stored upstream) and are interpreted on demand.
//!
//! # Time Model
//! Clock strings are `"HH:MM"`, converted to minutes past midnight.
//! Ranges are half-open: a slot ending at 10:00 and one starting at 10:00
//! do not meet.
//!
//! # Lenient Parsing
//! [`parse_time`] maps any malformed clock string to `0`. Callers that
//! need correctness validate upstream with [`parse_time_strict`] (see
//! [`crate::validation`]). A slot whose end is not after its start is
//! zero-length and never conflicts with anything.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TimeParseError;

/// Day of the week.
///
/// Indexed Sunday = 0 through Saturday = 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// All days, Sunday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Monday to Friday.
    pub const WORKWEEK: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// Parses a single day token, case-insensitively.
    ///
    /// Accepts full names, three-letter abbreviations and the usual
    /// registrar short forms ("Su", "Tu", "Tues", "Th", "Thur", "Thurs",
    /// "Sa", "M", "W", "F", "R"). Ambiguous single letters ("T", "S") are
    /// not recognised.
    pub fn parse(token: &str) -> Option<Self> {
        let lower = token.trim().trim_end_matches(['.', ',']).to_ascii_lowercase();
        let day = match lower.as_str() {
            "sunday" | "sun" | "su" => Weekday::Sunday,
            "monday" | "mon" | "m" => Weekday::Monday,
            "tuesday" | "tue" | "tues" | "tu" => Weekday::Tuesday,
            "wednesday" | "wed" | "w" => Weekday::Wednesday,
            "thursday" | "thu" | "thur" | "thurs" | "th" | "r" => Weekday::Thursday,
            "friday" | "fri" | "f" => Weekday::Friday,
            "saturday" | "sat" | "sa" => Weekday::Saturday,
            _ => return None,
        };
        Some(day)
    }

    /// Position in the week (Sunday = 0).
    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Full English name.
    pub fn name(self) -> &'static str {
        match self {
            Weekday::Sunday => "Sunday",
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }

    /// Three-letter abbreviation.
    pub fn short_name(self) -> &'static str {
        &self.name()[..3]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::parse(s).ok_or_else(|| format!("unknown weekday '{s}'"))
    }
}

/// Normalized day token used for day matching.
///
/// Tokens outside the weekday vocabulary are kept (lower-cased) so that
/// input with another vocabulary still matches itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DayKey {
    /// A recognised weekday.
    Known(Weekday),
    /// Any other token, lower-cased.
    Other(String),
}

impl DayKey {
    /// Normalizes a raw token.
    pub fn from_token(token: &str) -> Self {
        match Weekday::parse(token) {
            Some(day) => DayKey::Known(day),
            None => DayKey::Other(token.trim().to_lowercase()),
        }
    }

    /// Sort position: known weekdays first, in week order.
    pub fn sort_index(&self) -> u8 {
        match self {
            DayKey::Known(d) => d.index(),
            DayKey::Other(_) => 7,
        }
    }
}

/// One weekly meeting: day tokens and a `[start, end)` clock range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Whitespace-separated day tokens, e.g. `"Mon Wed"`.
    pub day: String,
    /// Start clock time, `"HH:MM"`.
    pub start: String,
    /// End clock time, `"HH:MM"` (exclusive).
    pub end: String,
}

impl TimeSlot {
    /// Creates a time slot.
    pub fn new(day: impl Into<String>, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            day: day.into(),
            start: start.into(),
            end: end.into(),
        }
    }

    /// Creates a slot on a single weekday from minute offsets.
    pub fn from_minutes(day: Weekday, start_min: u32, end_min: u32) -> Self {
        Self::new(day.short_name(), format_time(start_min), format_time(end_min))
    }

    /// Raw day tokens.
    pub fn day_tokens(&self) -> impl Iterator<Item = &str> {
        self.day.split_whitespace()
    }

    /// Normalized day keys, in token order.
    pub fn day_keys(&self) -> Vec<DayKey> {
        self.day_tokens().map(DayKey::from_token).collect()
    }

    /// Recognised weekdays among the tokens.
    pub fn weekdays(&self) -> Vec<Weekday> {
        self.day_tokens().filter_map(Weekday::parse).collect()
    }

    /// Start as minutes past midnight (lenient).
    #[inline]
    pub fn start_minutes(&self) -> u32 {
        parse_time(&self.start)
    }

    /// End as minutes past midnight (lenient).
    #[inline]
    pub fn end_minutes(&self) -> u32 {
        parse_time(&self.end)
    }

    /// Length in minutes; zero when `end <= start`.
    pub fn duration_minutes(&self) -> u32 {
        self.end_minutes().saturating_sub(self.start_minutes())
    }

    /// Whether the slot is zero-length (never conflicts).
    pub fn is_empty(&self) -> bool {
        self.end_minutes() <= self.start_minutes()
    }

    /// Whether a minute offset falls within `[start, end)`.
    pub fn contains_minute(&self, minute: u32) -> bool {
        minute >= self.start_minutes() && minute < self.end_minutes()
    }

    /// Sort key: (first day, start, end).
    pub fn sort_key(&self) -> (u8, u32, u32) {
        let first_day = self
            .day_keys()
            .iter()
            .map(DayKey::sort_index)
            .min()
            .unwrap_or(u8::MAX);
        (first_day, self.start_minutes(), self.end_minutes())
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}-{}", self.day, self.start, self.end)
    }
}

/// Parses `"HH:MM"` (or `"HH:MM:SS"`) into minutes past midnight.
///
/// Seconds are ignored. Malformed input (empty, no `:`, non-numeric
/// hours or minutes) yields `0`.
pub fn parse_time(s: &str) -> u32 {
    let mut fields = s.trim().split(':');
    let (Some(h), Some(m)) = (fields.next(), fields.next()) else {
        return 0;
    };
    match (h.trim().parse::<u32>(), m.trim().parse::<u32>()) {
        (Ok(h), Ok(m)) => h.saturating_mul(60).saturating_add(m),
        _ => 0,
    }
}

/// Parses `"HH:MM"` or `"HH:MM:SS"` strictly.
///
/// Hours must be 0-23, minutes and seconds 0-59. Seconds are validated,
/// then dropped.
pub fn parse_time_strict(s: &str) -> Result<u32, TimeParseError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(TimeParseError::Empty);
    }
    let (h, rest) = trimmed
        .split_once(':')
        .ok_or_else(|| TimeParseError::MissingSeparator(s.to_string()))?;
    let (m, sec) = match rest.split_once(':') {
        Some((m, sec)) => (m, Some(sec)),
        None => (rest, None),
    };

    let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    let two_digits = |p: &str| all_digits(p) && p.len() == 2;
    if !all_digits(h) || h.len() > 2 || !two_digits(m) || !sec.map_or(true, two_digits) {
        return Err(TimeParseError::NotNumeric(s.to_string()));
    }
    let hours: u32 = h.parse().map_err(|_| TimeParseError::NotNumeric(s.to_string()))?;
    let minutes: u32 = m.parse().map_err(|_| TimeParseError::NotNumeric(s.to_string()))?;
    let seconds: u32 = match sec {
        Some(sec) => sec.parse().map_err(|_| TimeParseError::NotNumeric(s.to_string()))?,
        None => 0,
    };
    if hours > 23 || minutes > 59 || seconds > 59 {
        return Err(TimeParseError::OutOfRange(s.to_string()));
    }
    Ok(hours * 60 + minutes)
}

/// Formats minutes past midnight as `"HH:MM"`.
pub fn format_time(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
