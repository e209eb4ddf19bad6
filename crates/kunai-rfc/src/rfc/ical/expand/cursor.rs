//! Calendar stepping and counting primitives shared by every generator.

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::rfc::ical::core::{Frequency, Weekday, WeekdayNum};

/// Returns whether `year` has a February 29th.
#[must_use]
pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

/// Number of days in `year`.
#[must_use]
pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// Number of days in `month` of `year`, or 0 for a month outside 1..=12.
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Resolves a signed position against a period of `len` units.
///
/// `1` is the first unit and `-1` the last; positions beyond the period give `None`.
#[must_use]
pub fn resolve_signed(value: i32, len: u32) -> Option<u32> {
    let len = i32::try_from(len).ok()?;
    let resolved = if value > 0 { value } else { len + value + 1 };
    if value == 0 || resolved < 1 || resolved > len {
        return None;
    }
    u32::try_from(resolved).ok()
}

/// Days between the week start and `weekday` (0 when `weekday` starts the week).
#[must_use]
pub fn days_from_week_start(weekday: chrono::Weekday, wkst: Weekday) -> u32 {
    (weekday.num_days_from_sunday() + 7 - wkst.to_chrono().num_days_from_sunday()) % 7
}

/// First day of the WKST-started week containing `date`.
#[must_use]
pub fn start_of_week(date: NaiveDate, wkst: Weekday) -> Option<NaiveDate> {
    let back = days_from_week_start(date.weekday(), wkst);
    date.checked_sub_days(Days::new(u64::from(back)))
}

/// Week number of a date under a given week start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekNumber {
    /// Calendar year the week is numbered in; differs from the date's year near January 1st.
    pub week_year: i32,
    /// 1-based week number.
    pub week: u32,
    /// Number of weeks in `week_year`.
    pub weeks_in_year: u32,
}

impl WeekNumber {
    /// Week number counted from the end of the week-year (`-1` is the last week).
    #[must_use]
    pub fn backward(self) -> i64 {
        i64::from(self.week) - i64::from(self.weeks_in_year) - 1
    }
}

/// Start of week 1 of `year`: the first WKST-started week holding at least four days of the year.
fn first_week_start(year: i32, wkst: Weekday) -> Option<NaiveDate> {
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let offset = days_from_week_start(jan1.weekday(), wkst);
    if offset <= 3 {
        jan1.checked_sub_days(Days::new(u64::from(offset)))
    } else {
        jan1.checked_add_days(Days::new(u64::from(7 - offset)))
    }
}

/// Computes the RFC 5545 week number of `date` with weeks starting on `wkst`.
///
/// With `wkst` = Monday this is the ISO 8601 week number.
#[must_use]
pub fn week_number(date: NaiveDate, wkst: Weekday) -> Option<WeekNumber> {
    let year = date.year();
    let this_year = first_week_start(year, wkst)?;
    let next_year = first_week_start(year + 1, wkst)?;

    let (week_year, start, end) = if date < this_year {
        (year - 1, first_week_start(year - 1, wkst)?, this_year)
    } else if date >= next_year {
        (year + 1, next_year, first_week_start(year + 2, wkst)?)
    } else {
        (year, this_year, next_year)
    };

    let week = u32::try_from((date - start).num_days() / 7 + 1).ok()?;
    let weeks_in_year = u32::try_from((end - start).num_days() / 7).ok()?;
    Some(WeekNumber {
        week_year,
        week,
        weeks_in_year,
    })
}

/// Forward and backward occurrence index of `date`'s weekday within its month.
#[must_use]
pub fn weekday_of_month(date: NaiveDate) -> (i32, i32) {
    let day = date.day();
    let len = days_in_month(date.year(), date.month());
    occurrence_pair(day, len)
}

/// Forward and backward occurrence index of `date`'s weekday within its year.
#[must_use]
pub fn weekday_of_year(date: NaiveDate) -> (i32, i32) {
    occurrence_pair(date.ordinal(), days_in_year(date.year()))
}

fn occurrence_pair(position: u32, len: u32) -> (i32, i32) {
    let forward = (position - 1) / 7 + 1;
    let backward = (len - position) / 7 + 1;
    // Both values are at most 53.
    (
        i32::try_from(forward).unwrap_or(i32::MAX),
        -i32::try_from(backward).unwrap_or(i32::MAX),
    )
}

/// Whether `date` matches any signed BYMONTHDAY value.
#[must_use]
pub fn matches_month_day(values: &[i8], date: NaiveDate) -> bool {
    let len = days_in_month(date.year(), date.month());
    values
        .iter()
        .any(|value| resolve_signed(i32::from(*value), len) == Some(date.day()))
}

/// Whether `date` matches any signed BYYEARDAY value.
#[must_use]
pub fn matches_year_day(values: &[i16], date: NaiveDate) -> bool {
    let len = days_in_year(date.year());
    values
        .iter()
        .any(|value| resolve_signed(i32::from(*value), len) == Some(date.ordinal()))
}

/// Whether `date` falls on any of the BYDAY weekdays, ignoring ordinals.
#[must_use]
pub fn matches_bare_weekday(days: &[WeekdayNum], date: NaiveDate) -> bool {
    let weekday = Weekday::from_chrono(date.weekday());
    days.iter().any(|day| day.weekday == weekday)
}

/// Whether `date` satisfies a single BYDAY entry.
///
/// Ordinals count within the month when `month_relative`, otherwise within the year.
#[must_use]
pub fn matches_weekday_num(entry: WeekdayNum, date: NaiveDate, month_relative: bool) -> bool {
    if entry.weekday != Weekday::from_chrono(date.weekday()) {
        return false;
    }
    let Some(ordinal) = entry.ordinal else {
        return true;
    };
    let (forward, backward) = if month_relative {
        weekday_of_month(date)
    } else {
        weekday_of_year(date)
    };
    let ordinal = i32::from(ordinal);
    ordinal == forward || ordinal == backward
}

/// A cursor over calendar positions whose day may not exist in every month.
///
/// Month and year stepping keep the day number fixed, so a cursor anchored on
/// the 31st visits short months as non-existent dates that callers skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DateCursor {
    year: i32,
    month: u32,
    day: u32,
}

/// Distance a [`DateCursor`] moves per step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Days(u64),
    Months(u32),
}

impl DateCursor {
    /// Creates a cursor positioned on an existing date.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }

    /// Creates a cursor on a possibly non-existent day of a month.
    #[must_use]
    pub const fn from_parts(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// The concrete date, or `None` when the day does not exist in this month.
    #[must_use]
    pub fn date(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    /// Whether the cursor lies strictly after `bound`.
    #[must_use]
    pub fn is_after(self, bound: NaiveDate) -> bool {
        self > Self::from_date(bound)
    }

    /// First day of the cursor's month.
    #[must_use]
    pub fn first_of_month(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Moves the cursor forward; `None` once the calendar range is exhausted.
    #[must_use]
    pub fn advance(self, step: Step) -> Option<Self> {
        match step {
            Step::Days(days) => self
                .date()?
                .checked_add_days(Days::new(days))
                .map(Self::from_date),
            Step::Months(months) => self.shift_months(i64::from(months)),
        }
    }

    /// Moves the cursor backward by one step.
    #[must_use]
    pub fn retreat(self, step: Step) -> Option<Self> {
        match step {
            Step::Days(days) => self
                .date()?
                .checked_sub_days(Days::new(days))
                .map(Self::from_date),
            Step::Months(months) => self.shift_months(-i64::from(months)),
        }
    }

    fn shift_months(self, delta: i64) -> Option<Self> {
        let index = i64::from(self.year) * 12 + i64::from(self.month) - 1 + delta;
        Some(Self {
            year: i32::try_from(index.div_euclid(12)).ok()?,
            month: u32::try_from(index.rem_euclid(12) + 1).ok()?,
            day: self.day,
        })
    }
}

/// Position of a date's FREQ period, counted in periods since a fixed origin.
///
/// Two dates share a period exactly when their indexes are equal, and the
/// difference between two indexes is the number of periods between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PeriodIndex(i64);

impl PeriodIndex {
    /// Index of the period of `freq` that contains `date`.
    #[must_use]
    pub fn of(freq: Frequency, date: NaiveDate, wkst: Weekday) -> Self {
        let days = |d: NaiveDate| i64::from(d.num_days_from_ce());
        Self(match freq {
            Frequency::Yearly => i64::from(date.year()),
            Frequency::Monthly => i64::from(date.year()) * 12 + i64::from(date.month()) - 1,
            Frequency::Weekly => {
                let start = start_of_week(date, wkst).unwrap_or(date);
                days(start).div_euclid(7)
            }
            Frequency::Daily | Frequency::Hourly | Frequency::Minutely | Frequency::Secondly => {
                days(date)
            }
        })
    }

    /// Whether this period is a multiple of `interval` periods after `origin`.
    #[must_use]
    pub fn is_active(self, origin: Self, interval: u32) -> bool {
        let distance = self.0 - origin.0;
        distance >= 0 && distance % i64::from(interval.max(1)) == 0
    }
}

/// First day of the FREQ period containing `date`.
#[must_use]
pub fn period_start(freq: Frequency, date: NaiveDate, wkst: Weekday) -> NaiveDate {
    match freq {
        Frequency::Yearly => date.with_ordinal(1),
        Frequency::Monthly => date.with_day(1),
        Frequency::Weekly => start_of_week(date, wkst),
        Frequency::Daily | Frequency::Hourly | Frequency::Minutely | Frequency::Secondly => {
            Some(date)
        }
    }
    .unwrap_or(date)
}

/// Last day of the FREQ period containing `date`.
#[must_use]
pub fn period_end(freq: Frequency, date: NaiveDate, wkst: Weekday) -> NaiveDate {
    match freq {
        Frequency::Yearly => NaiveDate::from_ymd_opt(date.year(), 12, 31),
        Frequency::Monthly => date.with_day(days_in_month(date.year(), date.month())),
        Frequency::Weekly => {
            start_of_week(date, wkst).and_then(|start| start.checked_add_days(Days::new(6)))
        }
        Frequency::Daily | Frequency::Hourly | Frequency::Minutely | Frequency::Secondly => {
            Some(date)
        }
    }
    .unwrap_or(date)
}

/// Adds whole years to `date`, clamping February 29th to the 28th.
#[must_use]
pub fn add_years(date: NaiveDate, years: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(years.checked_mul(12)?))
}
