//! DAILY rules.

use chrono::Days;

use super::passes_simple_filters;
use crate::rfc::ical::core::RRule;
use crate::rfc::ical::expand::occurrence::Emitter;
use crate::rfc::ical::expand::setpos;

/// Steps INTERVAL days from the anchor, keeping days that pass the BY* filters.
pub fn plain(rule: &RRule, emitter: &mut Emitter) {
    walk(rule, emitter, |date, emitter| emitter.offer(date));
}

/// Like [`plain`], but each day is its own BYSETPOS period of at most one candidate.
pub fn set_pos(rule: &RRule, emitter: &mut Emitter) {
    walk(rule, emitter, |date, emitter| {
        setpos::resolve(&[date], &rule.by_setpos, emitter);
    });
}

fn walk(
    rule: &RRule,
    emitter: &mut Emitter,
    mut emit: impl FnMut(chrono::NaiveDate, &mut Emitter),
) {
    let step = Days::new(u64::from(rule.interval_or_default()));
    let end = emitter.end_date();
    let mut date = emitter.anchor_date();
    while date <= end && !emitter.is_done() {
        if passes_simple_filters(rule, date) {
            emit(date, emitter);
        }
        let Some(next) = date.checked_add_days(step) else {
            break;
        };
        date = next;
    }
}
