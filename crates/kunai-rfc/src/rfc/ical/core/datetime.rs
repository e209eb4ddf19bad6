//! iCalendar DATE and DATE-TIME values as seen by the recurrence engine (RFC 5545 §3.3.4, §3.3.5).

use std::cmp::Ordering;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// A DATE or floating DATE-TIME value.
///
/// The variant is the "has-time" flag: comparisons between two DATE-TIME values
/// use the full timestamp, any comparison involving a DATE uses whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateValue {
    /// Whole-day value (`VALUE=DATE`).
    Date(NaiveDate),
    /// Date with time of day.
    DateTime(NaiveDateTime),
}

impl DateValue {
    /// Creates a DATE value, or `None` if the date does not exist.
    #[must_use]
    pub fn date(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self::Date)
    }

    /// Creates a DATE-TIME value, or `None` if the date or time does not exist.
    #[must_use]
    pub fn datetime(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Option<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        let time = NaiveTime::from_hms_opt(hour, minute, second)?;
        Some(Self::DateTime(date.and_time(time)))
    }

    /// Returns the calendar date.
    #[must_use]
    pub fn date_part(self) -> NaiveDate {
        match self {
            Self::Date(date) => date,
            Self::DateTime(datetime) => datetime.date(),
        }
    }

    /// Returns whether this value carries a time of day.
    #[must_use]
    pub const fn has_time(self) -> bool {
        matches!(self, Self::DateTime(_))
    }

    /// Returns a value of the same kind on another date, keeping the time of day.
    #[must_use]
    pub fn on_date(self, date: NaiveDate) -> Self {
        match self {
            Self::Date(_) => Self::Date(date),
            Self::DateTime(datetime) => Self::DateTime(date.and_time(datetime.time())),
        }
    }

    /// Compares two values at the coarser of their two resolutions.
    #[must_use]
    pub fn compare(self, other: Self) -> Ordering {
        match (self, other) {
            (Self::DateTime(a), Self::DateTime(b)) => a.cmp(&b),
            _ => self.date_part().cmp(&other.date_part()),
        }
    }

    /// Returns the canonical occurrence key: `YYYYMMDD`, suffixed with `THHMMSS` for DATE-TIME.
    #[must_use]
    pub fn key(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(date) => write!(f, "{}", date.format("%Y%m%d")),
            Self::DateTime(datetime) => write!(f, "{}", datetime.format("%Y%m%dT%H%M%S")),
        }
    }
}

impl From<NaiveDate> for DateValue {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl From<NaiveDateTime> for DateValue {
    fn from(datetime: NaiveDateTime) -> Self {
        Self::DateTime(datetime)
    }
}
