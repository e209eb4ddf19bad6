//! Per-year lookup of every index a day-level filter can ask about.

use chrono::{Datelike, NaiveDate};

use super::cursor::{
    days_in_month, days_in_year, week_number, weekday_of_month, weekday_of_year,
};
use crate::rfc::ical::core::{Weekday, WeekdayNum};

/// A forward (1-based) and backward (-1 is last) index pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    pub forward: i32,
    pub backward: i32,
}

impl Counter {
    fn new(position: u32, len: u32) -> Option<Self> {
        let forward = i32::try_from(position).ok()?;
        let len = i32::try_from(len).ok()?;
        Some(Self {
            forward,
            backward: forward - len - 1,
        })
    }

    /// Whether a signed BY* value names this position.
    #[must_use]
    pub fn matches(self, value: i32) -> bool {
        value == self.forward || value == self.backward
    }
}

/// Everything known about one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCounts {
    pub weekday: Weekday,
    pub month_day: Counter,
    pub year_day: Counter,
    /// Occurrence of this weekday within the month.
    pub month_weekday: Counter,
    /// Occurrence of this weekday within the year.
    pub year_weekday: Counter,
    /// WKST-aware week number within its week-year.
    pub week_no: Counter,
}

impl DayCounts {
    fn compute(date: NaiveDate, wkst: Weekday) -> Option<Self> {
        let (month_fwd, month_back) = weekday_of_month(date);
        let (year_fwd, year_back) = weekday_of_year(date);
        let week = week_number(date, wkst)?;
        Some(Self {
            weekday: Weekday::from_chrono(date.weekday()),
            month_day: Counter::new(date.day(), days_in_month(date.year(), date.month()))?,
            year_day: Counter::new(date.ordinal(), days_in_year(date.year()))?,
            month_weekday: Counter {
                forward: month_fwd,
                backward: month_back,
            },
            year_weekday: Counter {
                forward: year_fwd,
                backward: year_back,
            },
            week_no: Counter::new(week.week, week.weeks_in_year)?,
        })
    }

    /// Whether this day satisfies a BYDAY entry.
    #[must_use]
    pub fn matches_weekday(&self, entry: WeekdayNum, month_relative: bool) -> bool {
        if entry.weekday != self.weekday {
            return false;
        }
        entry.ordinal.is_none_or(|ordinal| {
            let counter = if month_relative {
                self.month_weekday
            } else {
                self.year_weekday
            };
            counter.matches(i32::from(ordinal))
        })
    }
}

/// Lazily built table of [`DayCounts`] for every day of one year.
///
/// Indexed by month then day; entries for days that do not exist stay `None`.
#[derive(Debug, Clone)]
pub struct DayCountTable {
    year: i32,
    wkst: Weekday,
    days: Box<[[Option<DayCounts>; 31]; 12]>,
}

impl DayCountTable {
    /// ## Summary
    /// Builds the table for `year` with weeks starting on `wkst`.
    #[must_use]
    pub fn build(year: i32, wkst: Weekday) -> Self {
        let mut days = Box::new([[None; 31]; 12]);
        for (month_index, row) in days.iter_mut().enumerate() {
            let month = u32::try_from(month_index + 1).unwrap_or(1);
            for day in 1..=days_in_month(year, month) {
                let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                    continue;
                };
                row[day as usize - 1] = DayCounts::compute(date, wkst);
            }
        }
        tracing::trace!(year, wkst = %wkst, "Built day count table");
        Self { year, wkst, days }
    }

    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Counts for `date`, or `None` when `date` lies outside this table's year.
    #[must_use]
    pub fn get(&self, date: NaiveDate) -> Option<&DayCounts> {
        if date.year() != self.year {
            return None;
        }
        self.days
            .get(date.month0() as usize)?
            .get(date.day0() as usize)?
            .as_ref()
    }

    /// Returns the table for `date`'s year, rebuilding `slot` when the year changed.
    pub fn for_date(slot: &mut Option<Self>, date: NaiveDate, wkst: Weekday) -> &Self {
        let stale = slot
            .as_ref()
            .is_none_or(|table| table.year != date.year() || table.wkst != wkst);
        if stale {
            *slot = Some(Self::build(date.year(), wkst));
        }
        slot.get_or_insert_with(|| Self::build(date.year(), wkst))
    }
}
