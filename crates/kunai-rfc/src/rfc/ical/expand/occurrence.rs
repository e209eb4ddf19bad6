//! Occurrence accumulation and the COUNT / UNTIL / window bookkeeping shared by all generators.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};

use super::cursor::add_years;
use super::{ExpansionOptions, ExpansionWindow};
use crate::rfc::ical::core::{DateValue, RRule};

/// Occurrences keyed by their canonical `YYYYMMDD[THHMMSS]` string.
///
/// Keys sort chronologically, so iteration yields occurrences in time order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccurrenceSet {
    entries: BTreeMap<String, DateValue>,
}

impl OccurrenceSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an occurrence; returns `false` if it was already present.
    pub fn insert(&mut self, value: DateValue) -> bool {
        self.entries.insert(value.key(), value).is_none()
    }

    /// Removes an occurrence by key, returning it if present.
    pub fn remove(&mut self, key: &str) -> Option<DateValue> {
        self.entries.remove(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in chronological order.
    #[must_use]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Occurrences in chronological order.
    #[must_use]
    pub fn values(&self) -> impl Iterator<Item = DateValue> + '_ {
        self.entries.values().copied()
    }

    /// Adds every occurrence of `other` to this set.
    pub fn merge(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }
}

impl IntoIterator for OccurrenceSet {
    type Item = (String, DateValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, DateValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<DateValue> for OccurrenceSet {
    fn from_iter<I: IntoIterator<Item = DateValue>>(iter: I) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

/// Receives candidate dates in ascending order and decides which become occurrences.
///
/// Every generator funnels its candidates through one emitter, so the
/// anchor, UNTIL, COUNT and window rules are applied identically everywhere.
/// COUNT counts every occurrence from the anchor on, including those before
/// the window; only occurrences inside the window are recorded.
#[derive(Debug)]
pub struct Emitter {
    anchor: DateValue,
    until: Option<DateValue>,
    window: ExpansionWindow,
    count: Option<u32>,
    counted: u32,
    done: bool,
    set: OccurrenceSet,
}

impl Emitter {
    /// ## Summary
    /// Creates an emitter for `rule` anchored at `anchor`.
    ///
    /// Without COUNT or UNTIL the emergency horizon stands in for UNTIL.
    #[must_use]
    pub fn new(
        rule: &RRule,
        anchor: DateValue,
        window: ExpansionWindow,
        options: &ExpansionOptions,
    ) -> Self {
        let until = rule.until.or_else(|| {
            if rule.count.is_some() {
                return None;
            }
            emergency_bound(window.end, options.emergency_horizon_years)
        });
        Self {
            anchor,
            until,
            window,
            count: rule.count,
            counted: 0,
            done: false,
            set: OccurrenceSet::new(),
        }
    }

    /// Last calendar date any occurrence can fall on.
    #[must_use]
    pub fn end_date(&self) -> NaiveDate {
        let window_end = self.window.end.date_part();
        self.until
            .map_or(window_end, |until| until.date_part().min(window_end))
    }

    #[must_use]
    pub fn anchor_date(&self) -> NaiveDate {
        self.anchor.date_part()
    }

    /// Whether no later candidate can produce an occurrence.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.done
    }

    /// Occurrences consumed toward COUNT so far, recorded or not.
    #[must_use]
    pub const fn counted(&self) -> u32 {
        self.counted
    }

    /// ## Summary
    /// Offers the next candidate date, which must not precede earlier offers.
    ///
    /// Candidates before the anchor are ignored. The first candidate past
    /// UNTIL or the window end, or beyond COUNT, finishes the emitter.
    pub fn offer(&mut self, date: NaiveDate) {
        if self.done || date < self.anchor_date() {
            return;
        }
        let occurrence = self.anchor.on_date(date);
        if occurrence.compare(self.anchor) == Ordering::Less {
            return;
        }
        let past_until = self
            .until
            .is_some_and(|until| occurrence.compare(until) == Ordering::Greater);
        if past_until || occurrence.compare(self.window.end) == Ordering::Greater {
            self.done = true;
            return;
        }
        if self.count.is_some_and(|count| self.counted >= count) {
            self.done = true;
            return;
        }

        self.counted += 1;
        if occurrence.compare(self.window.start) != Ordering::Less {
            self.set.insert(occurrence);
        }
        if self.count.is_some_and(|count| self.counted >= count) {
            self.done = true;
        }
    }

    /// Consumes the emitter, returning the recorded occurrences.
    #[must_use]
    pub fn finish(self) -> OccurrenceSet {
        tracing::trace!(
            counted = self.counted,
            recorded = self.set.len(),
            "Expansion finished"
        );
        self.set
    }
}

fn emergency_bound(window_end: DateValue, years: u32) -> Option<DateValue> {
    match window_end {
        DateValue::Date(date) => add_years(date, years).map(DateValue::Date),
        DateValue::DateTime(datetime) => add_years(datetime.date(), years)
            .map(|date| DateValue::DateTime(NaiveDateTime::new(date, datetime.time()))),
    }
}
