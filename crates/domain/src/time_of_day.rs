//! Time of day: an hour/minute pair parsed from provider strings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A wall-clock time with minute precision.
///
/// Invariant: `hour <= 23` and `minute <= 59`. Construct through
/// [`TimeOfDay::new`] or [`TimeOfDay::parse`]. Serialized as `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    /// Build a time, returning `None` when out of range.
    #[must_use]
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour <= 23 && minute <= 59).then_some(Self { hour, minute })
    }

    /// Parse provider text such as `"5:07"`, `"05:07"` or `"13:45:00"`.
    ///
    /// The text is split on `:` and only the first two segments are used.
    /// Single-digit segments are zero-padded. Returns `None` when there are
    /// fewer than two segments, when a segment is not a one- or two-digit
    /// number, or when the value is out of range.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.trim().split(':').map(str::trim);
        let hour = parts.next()?;
        let minute = parts.next()?;
        Self::new(parse_segment(hour)?, parse_segment(minute)?)
    }

    #[must_use]
    pub fn hour(self) -> u8 {
        self.hour
    }

    #[must_use]
    pub fn minute(self) -> u8 {
        self.minute
    }
}

fn parse_segment(segment: &str) -> Option<u8> {
    let padded = match segment.len() {
        1 => format!("0{segment}"),
        2 => segment.to_string(),
        _ => return None,
    };
    if !padded.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    padded.parse().ok()
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid time of day `{value}`"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_pad_single_digit_hour_and_minute() {
        assert_eq!(TimeOfDay::parse("5:7").unwrap().to_string(), "05:07");
    }

    #[test]
    fn should_keep_two_digit_form() {
        assert_eq!(TimeOfDay::parse("13:45").unwrap().to_string(), "13:45");
    }

    #[test]
    fn should_ignore_seconds_segment() {
        assert_eq!(TimeOfDay::parse("04:09:59").unwrap().to_string(), "04:09");
    }

    #[test]
    fn should_trim_whitespace_around_segments() {
        assert_eq!(TimeOfDay::parse(" 6 : 30 ").unwrap().to_string(), "06:30");
    }

    #[test]
    fn should_be_absent_without_colon() {
        assert_eq!(TimeOfDay::parse("1330"), None);
    }

    #[test]
    fn should_be_absent_when_empty() {
        assert_eq!(TimeOfDay::parse(""), None);
        assert_eq!(TimeOfDay::parse(":"), None);
    }

    #[test]
    fn should_be_absent_when_not_numeric() {
        assert_eq!(TimeOfDay::parse("ab:cd"), None);
        assert_eq!(TimeOfDay::parse("1:3a"), None);
    }

    #[test]
    fn should_be_absent_when_out_of_range() {
        assert_eq!(TimeOfDay::parse("25:99"), None);
        assert_eq!(TimeOfDay::parse("24:00"), None);
        assert_eq!(TimeOfDay::parse("23:60"), None);
    }

    #[test]
    fn should_be_absent_when_segment_too_long() {
        assert_eq!(TimeOfDay::parse("123:45"), None);
    }

    #[test]
    fn should_distinguish_midnight_from_absence() {
        let midnight = TimeOfDay::parse("0:0").unwrap();
        assert_eq!(midnight, TimeOfDay::new(0, 0).unwrap());
        assert_eq!(midnight.to_string(), "00:00");
    }

    #[test]
    fn should_serialize_as_canonical_string() {
        let t = TimeOfDay::new(5, 3).unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"05:03\"");
        let back: TimeOfDay = serde_json::from_str("\"5:3\"").unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn should_reject_invalid_string_on_deserialize() {
        assert!(serde_json::from_str::<TimeOfDay>("\"noon\"").is_err());
    }
}
