//! MONTHLY rules.

use chrono::{Datelike, NaiveDate};

use super::{emit_period, month_allowed, passes_simple_filters, weekdays_in_month};
use crate::rfc::ical::core::RRule;
use crate::rfc::ical::expand::cursor::{DateCursor, Step, days_in_month};
use crate::rfc::ical::expand::occurrence::Emitter;

/// Without day filters, the anchor's day of every INTERVAL-th month (skipping
/// months too short for it); otherwise the month's days that pass BYMONTHDAY
/// and bare BYDAY.
pub fn plain(rule: &RRule, emitter: &mut Emitter) {
    let anchor_day = emitter.anchor_date().day();
    let filtered = !rule.by_monthday.is_empty() || rule.has_by_day();
    for_each_month(rule, emitter, |year, month| {
        if filtered {
            (1..=days_in_month(year, month))
                .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
                .filter(|date| passes_simple_filters(rule, *date))
                .collect()
        } else {
            NaiveDate::from_ymd_opt(year, month, anchor_day)
                .into_iter()
                .collect()
        }
    });
}

/// Expands BYDAY (ordinals counted within the month) in every INTERVAL-th month.
pub fn by_day(rule: &RRule, emitter: &mut Emitter) {
    for_each_month(rule, emitter, |year, month| {
        weekdays_in_month(rule.by_day(), year, month)
    });
}

fn for_each_month(
    rule: &RRule,
    emitter: &mut Emitter,
    candidates: impl Fn(i32, u32) -> Vec<NaiveDate>,
) {
    let anchor = emitter.anchor_date();
    let step = Step::Months(rule.interval_or_default());
    let end = emitter.end_date();
    let mut cursor = DateCursor::from_parts(anchor.year(), anchor.month(), 1);
    while !cursor.is_after(end) && !emitter.is_done() {
        if month_allowed(rule, cursor.month()) {
            let dates = candidates(cursor.year(), cursor.month());
            emit_period(&dates, rule, emitter);
        }
        let Some(next) = cursor.advance(step) else {
            break;
        };
        cursor = next;
    }
}
