//! YEARLY rules.

use chrono::{Datelike, NaiveDate};

use super::{emit_period, month_days, sorted_months, weekdays_in_month};
use crate::rfc::ical::core::RRule;
use crate::rfc::ical::expand::cursor::{DateCursor, Step, matches_month_day};
use crate::rfc::ical::expand::occurrence::Emitter;

/// ## Summary
/// BYMONTH and BYMONTHDAY combinations within every INTERVAL-th year.
///
/// Months come from BYMONTH, else all twelve when BYMONTHDAY is given, else
/// the anchor's month. Days come from BYMONTHDAY, else the anchor's day,
/// which skips years where it does not exist.
pub fn plain(rule: &RRule, emitter: &mut Emitter) {
    let anchor = emitter.anchor_date();
    let months = if !rule.by_month.is_empty() {
        sorted_months(rule)
    } else if !rule.by_monthday.is_empty() {
        (1..=12).collect()
    } else {
        vec![anchor.month()]
    };
    for_each_year(rule, emitter, |year| {
        let mut dates = Vec::new();
        for month in &months {
            if rule.by_monthday.is_empty() {
                dates.extend(NaiveDate::from_ymd_opt(year, *month, anchor.day()));
            } else {
                dates.extend(
                    month_days(&rule.by_monthday, year, *month)
                        .into_iter()
                        .filter_map(|day| NaiveDate::from_ymd_opt(year, *month, day)),
                );
            }
        }
        dates
    });
}

/// Expands BYDAY within each BYMONTH month (ordinals counted within the month).
pub fn by_day(rule: &RRule, emitter: &mut Emitter) {
    let months = sorted_months(rule);
    for_each_year(rule, emitter, |year| {
        months
            .iter()
            .flat_map(|month| weekdays_in_month(rule.by_day(), year, *month))
            .filter(|date| {
                rule.by_monthday.is_empty() || matches_month_day(&rule.by_monthday, *date)
            })
            .collect()
    });
}

fn for_each_year(
    rule: &RRule,
    emitter: &mut Emitter,
    candidates: impl Fn(i32) -> Vec<NaiveDate>,
) {
    // An INTERVAL too large to express in months never reaches a second year.
    let step = rule.interval_or_default().checked_mul(12).map(Step::Months);
    let end = emitter.end_date();
    let mut cursor = DateCursor::from_parts(emitter.anchor_date().year(), 1, 1);
    while !cursor.is_after(end) && !emitter.is_done() {
        let dates = candidates(cursor.year());
        emit_period(&dates, rule, emitter);
        let Some(next) = step.and_then(|step| cursor.advance(step)) else {
            break;
        };
        cursor = next;
    }
}
