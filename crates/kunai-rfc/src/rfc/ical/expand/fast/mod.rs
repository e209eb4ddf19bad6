//! Specialized generators, one per [`Shape`](super::Shape).
//!
//! Each walks whole FREQ periods and enumerates the period's candidates
//! directly instead of testing every day against a lookup table. Output must
//! match the general generator for every rule of the shape.

pub mod daily;
pub mod monthly;
pub mod weekly;
pub mod yearly;

use chrono::{Datelike, NaiveDate};

use super::cursor::{
    days_in_month, matches_bare_weekday, matches_month_day, matches_year_day, resolve_signed,
};
use super::occurrence::Emitter;
use super::setpos;
use crate::rfc::ical::core::{RRule, WeekdayNum};

/// Offers one period's ascending candidates, through BYSETPOS when the rule has it.
fn emit_period(candidates: &[NaiveDate], rule: &RRule, emitter: &mut Emitter) {
    if rule.by_setpos.is_empty() {
        for date in candidates {
            emitter.offer(*date);
            if emitter.is_done() {
                break;
            }
        }
    } else {
        setpos::resolve(candidates, &rule.by_setpos, emitter);
    }
}

/// Whether `month` passes BYMONTH.
fn month_allowed(rule: &RRule, month: u32) -> bool {
    rule.by_month.is_empty()
        || u8::try_from(month).is_ok_and(|month| rule.by_month.contains(&month))
}

/// Whether `date` passes every filter that needs no ordinal context.
fn passes_simple_filters(rule: &RRule, date: NaiveDate) -> bool {
    month_allowed(rule, date.month())
        && (rule.by_yearday.is_empty() || matches_year_day(&rule.by_yearday, date))
        && (rule.by_monthday.is_empty() || matches_month_day(&rule.by_monthday, date))
        && (!rule.has_by_day() || matches_bare_weekday(rule.by_day(), date))
}

/// BYMONTH values as sorted month numbers.
fn sorted_months(rule: &RRule) -> Vec<u32> {
    let mut months: Vec<u32> = rule.by_month.iter().map(|m| u32::from(*m)).collect();
    months.sort_unstable();
    months.dedup();
    months
}

/// Days of a month named by signed BYMONTHDAY values, ascending.
fn month_days(values: &[i8], year: i32, month: u32) -> Vec<u32> {
    let len = days_in_month(year, month);
    let mut days: Vec<u32> = values
        .iter()
        .filter_map(|value| resolve_signed(i32::from(*value), len))
        .collect();
    days.sort_unstable();
    days.dedup();
    days
}

/// ## Summary
/// Expands BYDAY entries into the dates of one month, ascending.
///
/// Bare entries yield every matching weekday; ordinal entries yield the nth
/// (or nth-from-last) one, or nothing when the month has too few.
fn weekdays_in_month(entries: &[WeekdayNum], year: i32, month: u32) -> Vec<NaiveDate> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let len = days_in_month(year, month);
    let first_weekday = first.weekday().num_days_from_monday();

    let mut days = Vec::new();
    for entry in entries {
        let offset = (entry.weekday.to_chrono().num_days_from_monday() + 7 - first_weekday) % 7;
        let matching: Vec<u32> = (1 + offset..=len).step_by(7).collect();
        let Some(ordinal) = entry.ordinal else {
            days.extend_from_slice(&matching);
            continue;
        };
        let count = u32::try_from(matching.len()).unwrap_or(0);
        if let Some(nth) = resolve_signed(i32::from(ordinal), count)
            && let Some(day) = matching.get(nth as usize - 1)
        {
            days.push(*day);
        }
    }
    days.sort_unstable();
    days.dedup();
    days.into_iter()
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .collect()
}
