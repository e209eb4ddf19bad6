//! iCalendar RRULE (Recurrence Rule) value type (RFC 5545 §3.3.10, §3.8.5.3).

use std::fmt;

use super::DateValue;

/// Recurrence frequency (RFC 5545 §3.3.10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    Secondly,
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Secondly => "SECONDLY",
            Self::Minutely => "MINUTELY",
            Self::Hourly => "HOURLY",
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }

    /// Parses a frequency from a string (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.to_ascii_uppercase().as_str() {
            "SECONDLY" => Self::Secondly,
            "MINUTELY" => Self::Minutely,
            "HOURLY" => Self::Hourly,
            "DAILY" => Self::Daily,
            "WEEKLY" => Self::Weekly,
            "MONTHLY" => Self::Monthly,
            "YEARLY" => Self::Yearly,
            _ => return None,
        })
    }

    /// Returns whether the expansion engine generates occurrences for this frequency.
    #[must_use]
    pub const fn is_day_or_coarser(self) -> bool {
        matches!(
            self,
            Self::Daily | Self::Weekly | Self::Monthly | Self::Yearly
        )
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
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
    /// Returns the two-letter abbreviation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sunday => "SU",
            Self::Monday => "MO",
            Self::Tuesday => "TU",
            Self::Wednesday => "WE",
            Self::Thursday => "TH",
            Self::Friday => "FR",
            Self::Saturday => "SA",
        }
    }

    /// Parses a weekday from a two-letter abbreviation (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.to_ascii_uppercase().as_str() {
            "SU" => Self::Sunday,
            "MO" => Self::Monday,
            "TU" => Self::Tuesday,
            "WE" => Self::Wednesday,
            "TH" => Self::Thursday,
            "FR" => Self::Friday,
            "SA" => Self::Saturday,
            _ => return None,
        })
    }

    /// Returns all weekdays in order (Sunday through Saturday).
    #[must_use]
    pub const fn all() -> [Self; 7] {
        [
            Self::Sunday,
            Self::Monday,
            Self::Tuesday,
            Self::Wednesday,
            Self::Thursday,
            Self::Friday,
            Self::Saturday,
        ]
    }

    /// Converts to the `chrono` weekday used for date arithmetic.
    #[must_use]
    pub const fn to_chrono(self) -> chrono::Weekday {
        match self {
            Self::Sunday => chrono::Weekday::Sun,
            Self::Monday => chrono::Weekday::Mon,
            Self::Tuesday => chrono::Weekday::Tue,
            Self::Wednesday => chrono::Weekday::Wed,
            Self::Thursday => chrono::Weekday::Thu,
            Self::Friday => chrono::Weekday::Fri,
            Self::Saturday => chrono::Weekday::Sat,
        }
    }

    /// Converts from a `chrono` weekday.
    #[must_use]
    pub const fn from_chrono(weekday: chrono::Weekday) -> Self {
        match weekday {
            chrono::Weekday::Sun => Self::Sunday,
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Weekday with optional occurrence number.
///
/// Used in BYDAY rule part. Examples:
/// - `MO` - every Monday
/// - `1MO` - first Monday of the month/year
/// - `-1FR` - last Friday of the month/year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekdayNum {
    /// Optional occurrence number (-53 to 53, excluding 0).
    pub ordinal: Option<i8>,
    /// The day of the week.
    pub weekday: Weekday,
}

impl WeekdayNum {
    /// Creates a weekday occurrence without an ordinal.
    #[must_use]
    pub const fn every(weekday: Weekday) -> Self {
        Self {
            ordinal: None,
            weekday,
        }
    }

    /// Creates a weekday occurrence with an ordinal.
    ///
    /// ## Panics
    ///
    /// Panics if ordinal is 0 or outside the range -53..=53.
    #[must_use]
    pub fn nth(ordinal: i8, weekday: Weekday) -> Self {
        assert!(ordinal != 0 && (-53..=53).contains(&ordinal));
        Self {
            ordinal: Some(ordinal),
            weekday,
        }
    }

    /// Returns whether this entry is a bare weekday (no ordinal).
    #[must_use]
    pub const fn is_bare(self) -> bool {
        self.ordinal.is_none()
    }
}

impl fmt::Display for WeekdayNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(n) = self.ordinal {
            write!(f, "{n}")?;
        }
        write!(f, "{}", self.weekday)
    }
}

/// Recurrence rule (RFC 5545 §3.3.10, §3.8.5.3).
///
/// A normalized rule as handed to the expansion engine. Lists are kept in the
/// order they were written; the engine treats them as sets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RRule {
    /// Recurrence frequency (required).
    pub freq: Option<Frequency>,

    /// Recurrence interval (default: 1).
    /// Defines how often the frequency repeats.
    pub interval: Option<u32>,

    /// Inclusive end bound, same value kind as the anchor (mutually exclusive with count).
    pub until: Option<DateValue>,

    /// Number of occurrences (mutually exclusive with until).
    pub count: Option<u32>,

    /// Week start day (default: Monday).
    pub wkst: Option<Weekday>,

    /// By-second list (0-60, 60 for leap second). Accepted, not filtered.
    pub by_second: Vec<u8>,

    /// By-minute list (0-59). Accepted, not filtered.
    pub by_minute: Vec<u8>,

    /// By-hour list (0-23). Accepted, not filtered.
    pub by_hour: Vec<u8>,

    /// By-day list with optional occurrence numbers.
    ///
    /// `Some(vec![])` means BYDAY was written but none of its tokens named a weekday.
    pub by_day: Option<Vec<WeekdayNum>>,

    /// By-monthday list (-31 to 31, excluding 0).
    pub by_monthday: Vec<i8>,

    /// By-yearday list (-366 to 366, excluding 0).
    pub by_yearday: Vec<i16>,

    /// By-weekno list (-53 to 53, excluding 0).
    pub by_weekno: Vec<i8>,

    /// By-month list (1-12).
    pub by_month: Vec<u8>,

    /// By-setpos list (-366 to 366, excluding 0).
    /// Filters on position within the frequency period.
    pub by_setpos: Vec<i16>,
}

impl RRule {
    /// Creates a new empty recurrence rule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a daily recurrence rule.
    #[must_use]
    pub fn daily() -> Self {
        Self {
            freq: Some(Frequency::Daily),
            ..Self::default()
        }
    }

    /// Creates a weekly recurrence rule.
    #[must_use]
    pub fn weekly() -> Self {
        Self {
            freq: Some(Frequency::Weekly),
            ..Self::default()
        }
    }

    /// Creates a monthly recurrence rule.
    #[must_use]
    pub fn monthly() -> Self {
        Self {
            freq: Some(Frequency::Monthly),
            ..Self::default()
        }
    }

    /// Creates a yearly recurrence rule.
    #[must_use]
    pub fn yearly() -> Self {
        Self {
            freq: Some(Frequency::Yearly),
            ..Self::default()
        }
    }

    /// Sets the interval.
    #[must_use]
    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Sets the count.
    #[must_use]
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self.until = None; // Mutually exclusive
        self
    }

    /// Sets the until bound.
    #[must_use]
    pub fn with_until(mut self, until: DateValue) -> Self {
        self.until = Some(until);
        self.count = None; // Mutually exclusive
        self
    }

    /// Sets the by-day list.
    #[must_use]
    pub fn with_by_day(mut self, days: Vec<WeekdayNum>) -> Self {
        self.by_day = Some(days);
        self
    }

    /// Sets the by-month list.
    #[must_use]
    pub fn with_by_month(mut self, months: Vec<u8>) -> Self {
        self.by_month = months;
        self
    }

    /// Sets the by-monthday list.
    #[must_use]
    pub fn with_by_monthday(mut self, days: Vec<i8>) -> Self {
        self.by_monthday = days;
        self
    }

    /// Sets the by-yearday list.
    #[must_use]
    pub fn with_by_yearday(mut self, days: Vec<i16>) -> Self {
        self.by_yearday = days;
        self
    }

    /// Sets the by-weekno list.
    #[must_use]
    pub fn with_by_weekno(mut self, weeks: Vec<i8>) -> Self {
        self.by_weekno = weeks;
        self
    }

    /// Sets the by-setpos list.
    #[must_use]
    pub fn with_by_setpos(mut self, positions: Vec<i16>) -> Self {
        self.by_setpos = positions;
        self
    }

    /// Sets the week start day.
    #[must_use]
    pub fn with_wkst(mut self, wkst: Weekday) -> Self {
        self.wkst = Some(wkst);
        self
    }

    /// Returns the interval, defaulting to 1.
    #[must_use]
    pub fn interval_or_default(&self) -> u32 {
        self.interval.unwrap_or(1).max(1)
    }

    /// Returns the week start, defaulting to Monday.
    #[must_use]
    pub fn week_start(&self) -> Weekday {
        self.wkst.unwrap_or(Weekday::Monday)
    }

    /// Returns the BYDAY entries, empty when BYDAY is absent.
    #[must_use]
    pub fn by_day(&self) -> &[WeekdayNum] {
        self.by_day.as_deref().unwrap_or_default()
    }

    /// Returns whether BYDAY has at least one entry.
    #[must_use]
    pub fn has_by_day(&self) -> bool {
        !self.by_day().is_empty()
    }

    /// Returns whether every BYDAY entry is a bare weekday.
    #[must_use]
    pub fn by_day_is_bare(&self) -> bool {
        self.by_day().iter().all(|day| day.is_bare())
    }

    /// Returns whether any day-level filter (BYYEARDAY, BYMONTHDAY, BYDAY) is present.
    #[must_use]
    pub fn has_day_filter(&self) -> bool {
        !self.by_yearday.is_empty() || !self.by_monthday.is_empty() || self.has_by_day()
    }
}

impl fmt::Display for RRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join<T: ToString>(values: &[T]) -> String {
            values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",")
        }

        let mut parts = Vec::new();

        if let Some(ref freq) = self.freq {
            parts.push(format!("FREQ={freq}"));
        }

        if let Some(interval) = self.interval
            && interval != 1
        {
            parts.push(format!("INTERVAL={interval}"));
        }

        if let Some(ref until) = self.until {
            parts.push(format!("UNTIL={until}"));
        }

        if let Some(count) = self.count {
            parts.push(format!("COUNT={count}"));
        }

        if let Some(wkst) = self.wkst {
            parts.push(format!("WKST={wkst}"));
        }

        let lists = [
            ("BYSECOND", join(&self.by_second)),
            ("BYMINUTE", join(&self.by_minute)),
            ("BYHOUR", join(&self.by_hour)),
            ("BYDAY", join(self.by_day())),
            ("BYMONTHDAY", join(&self.by_monthday)),
            ("BYYEARDAY", join(&self.by_yearday)),
            ("BYWEEKNO", join(&self.by_weekno)),
            ("BYMONTH", join(&self.by_month)),
            ("BYSETPOS", join(&self.by_setpos)),
        ];
        for (name, value) in lists {
            if !value.is_empty() {
                parts.push(format!("{name}={value}"));
            }
        }

        write!(f, "{}", parts.join(";"))
    }
}
