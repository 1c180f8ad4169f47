//! Calendar-date and time-of-day helpers.
//!
//! Schedules carry a date and a wall-clock start time without timezone. All
//! proximity reasoning happens on the time of day of a single date: a window
//! that would spill past midnight is clamped to the day rather than wrapped
//! into the neighbouring date.

use chrono::{Duration, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Canonical wire format for dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Canonical wire format for times of day.
pub const TIME_FORMAT: &str = "%H:%M";

/// Accepted alternative with seconds (as stored by SQL `TIME` columns).
const TIME_FORMAT_WITH_SECONDS: &str = "%H:%M:%S";

/// First instant of a day.
pub const START_OF_DAY: NaiveTime = match NaiveTime::from_hms_opt(0, 0, 0) {
    Some(t) => t,
    None => panic!("00:00:00 is a valid time"),
};

/// Last whole second of a day.
pub const END_OF_DAY: NaiveTime = match NaiveTime::from_hms_opt(23, 59, 59) {
    Some(t) => t,
    None => panic!("23:59:59 is a valid time"),
};

/// Errors raised when a date or time string cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeParseError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    Date(String),
    #[error("invalid time '{0}', expected HH:MM")]
    Time(String),
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate, TimeParseError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| TimeParseError::Date(value.to_string()))
}

/// Parse a 24-hour `HH:MM` (or `HH:MM:SS`) time of day.
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, TimeParseError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(trimmed, TIME_FORMAT_WITH_SECONDS))
        .map_err(|_| TimeParseError::Time(value.to_string()))
}

/// Render a time of day as `HH:MM`, keeping seconds only when present.
pub fn format_time_of_day(time: NaiveTime) -> String {
    if time.second() == 0 {
        time.format(TIME_FORMAT).to_string()
    } else {
        time.format(TIME_FORMAT_WITH_SECONDS).to_string()
    }
}

/// Shift a time of day by `minutes`, returning `None` when the result would
/// fall on another calendar date or the offset is out of range.
pub fn shift_within_day(time: NaiveTime, minutes: i64) -> Option<NaiveTime> {
    let offset = Duration::try_minutes(minutes)?;
    let (shifted, wrapped_secs) = time.overflowing_add_signed(offset);
    (wrapped_secs == 0).then_some(shifted)
}

/// Inclusive time-of-day interval on a single date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl TimeWindow {
    /// Window of `radius_minutes` on either side of `center`, clamped to
    /// `[00:00, 23:59:59]`.
    pub fn around(center: NaiveTime, radius_minutes: i64) -> Self {
        let start = shift_within_day(center, -radius_minutes).unwrap_or(START_OF_DAY);
        let end = shift_within_day(center, radius_minutes).unwrap_or(END_OF_DAY);
        Self { start, end }
    }

    /// Whether `time` lies inside the window (both ends inclusive).
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time <= self.end
    }
}

/// Serde adapter writing `NaiveTime` as `HH:MM` and reading `HH:MM[:SS]`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_time_of_day(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time_of_day(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
#[path = "time_tests.rs"]
mod time_tests;
