//! WEEKLY rules.

use chrono::{Datelike, Days, NaiveDate};

use super::{emit_period, month_allowed};
use crate::rfc::ical::core::RRule;
use crate::rfc::ical::expand::cursor::{matches_bare_weekday, start_of_week};
use crate::rfc::ical::expand::occurrence::Emitter;

/// Steps INTERVAL weeks from the anchor on the anchor's weekday.
pub fn plain(rule: &RRule, emitter: &mut Emitter) {
    let step = Days::new(7 * u64::from(rule.interval_or_default()));
    let end = emitter.end_date();
    let mut date = emitter.anchor_date();
    while date <= end && !emitter.is_done() {
        if month_allowed(rule, date.month()) {
            emitter.offer(date);
        }
        let Some(next) = date.checked_add_days(step) else {
            break;
        };
        date = next;
    }
}

/// Visits the BYDAY weekdays of every INTERVAL-th week, weeks starting on WKST.
pub fn by_day(rule: &RRule, emitter: &mut Emitter) {
    for_each_week(rule, emitter, |week, emitter| {
        for date in week {
            emitter.offer(date);
            if emitter.is_done() {
                break;
            }
        }
    });
}

/// Like [`by_day`], applying BYSETPOS to each week's days.
pub fn by_day_set_pos(rule: &RRule, emitter: &mut Emitter) {
    for_each_week(rule, emitter, |week, emitter| emit_period(&week, rule, emitter));
}

fn for_each_week(
    rule: &RRule,
    emitter: &mut Emitter,
    mut visit: impl FnMut(Vec<NaiveDate>, &mut Emitter),
) {
    let anchor = emitter.anchor_date();
    let Some(mut week_start) = start_of_week(anchor, rule.week_start()) else {
        return;
    };
    let step = Days::new(7 * u64::from(rule.interval_or_default()));
    let end = emitter.end_date();
    while week_start <= end && !emitter.is_done() {
        let days: Vec<NaiveDate> = (0..7)
            .filter_map(|offset| week_start.checked_add_days(Days::new(offset)))
            .filter(|date| {
                *date >= anchor
                    && matches_bare_weekday(rule.by_day(), *date)
                    && month_allowed(rule, date.month())
            })
            .collect();
        visit(days, emitter);
        let Some(next) = week_start.checked_add_days(step) else {
            break;
        };
        week_start = next;
    }
}
