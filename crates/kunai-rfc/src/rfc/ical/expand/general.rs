//! Fallback generator that can expand any valid rule.
//!
//! Walks a [`DateCursor`] from the anchor at the finest granularity the rule's
//! filters need, gates each date on INTERVAL through its FREQ period, and tests
//! it against a per-year [`DayCountTable`].

use chrono::{Datelike, NaiveDate};

use super::cursor::{DateCursor, PeriodIndex, Step, period_end};
use super::occurrence::Emitter;
use super::setpos::SetPosState;
use super::table::{DayCountTable, DayCounts};
use crate::rfc::ical::core::{Frequency, RRule, Weekday};

/// Cursor step for a rule: days when a day-level filter is present, weeks for
/// BYWEEKNO alone, months for MONTHLY or YEARLY with BYMONTH, else one FREQ period.
#[must_use]
pub fn step_for(rule: &RRule, freq: Frequency) -> Step {
    if rule.has_day_filter() {
        return Step::Days(1);
    }
    if !rule.by_weekno.is_empty() {
        return Step::Days(7);
    }
    match freq {
        Frequency::Yearly if rule.by_month.is_empty() => Step::Months(12),
        Frequency::Yearly | Frequency::Monthly => Step::Months(1),
        Frequency::Weekly => Step::Days(7),
        Frequency::Daily | Frequency::Hourly | Frequency::Minutely | Frequency::Secondly => {
            Step::Days(1)
        }
    }
}

/// ## Summary
/// Expands `rule` into `emitter` by exhaustive stepping.
pub fn expand(rule: &RRule, emitter: &mut Emitter) {
    let Some(freq) = rule.freq else {
        return;
    };
    let wkst = rule.week_start();
    let interval = rule.interval_or_default();
    let step = step_for(rule, freq);
    let anchor = emitter.anchor_date();
    let anchor_period = PeriodIndex::of(freq, anchor, wkst);
    let month_relative = freq == Frequency::Monthly || !rule.by_month.is_empty();
    let set_pos = !rule.by_setpos.is_empty();

    let mut end = emitter.end_date();
    let mut cursor = DateCursor::from_date(anchor);
    if set_pos {
        // Monthly and yearly positions count from the period start; a weekly
        // period begins at the anchor. Every period runs to its end.
        if matches!(freq, Frequency::Monthly | Frequency::Yearly) {
            cursor = rewind_to_period_start(cursor, step, freq, wkst, anchor_period);
        }
        end = period_end(freq, end, wkst);
    }
    tracing::trace!(?step, %anchor, %end, set_pos, "General expansion");

    let mut table = None;
    let mut state = SetPosState::Flushed;
    while !cursor.is_after(end) && !emitter.is_done() {
        if let Some(date) = cursor.date() {
            let period = PeriodIndex::of(freq, date, wkst);
            if period.is_active(anchor_period, interval) {
                let counts = DayCountTable::for_date(&mut table, date, wkst).get(date);
                if counts.is_some_and(|counts| passes(rule, date, counts, month_relative)) {
                    if set_pos {
                        state.push(period, date, &rule.by_setpos, emitter);
                    } else {
                        emitter.offer(date);
                    }
                }
            }
        }
        let Some(next) = cursor.advance(step) else {
            break;
        };
        cursor = next;
    }
    state.flush(&rule.by_setpos, emitter);
}

/// Steps back while the previous position stays in the anchor's period.
fn rewind_to_period_start(
    mut cursor: DateCursor,
    step: Step,
    freq: Frequency,
    wkst: Weekday,
    anchor_period: PeriodIndex,
) -> DateCursor {
    while let Some(previous) = cursor.retreat(step)
        && let Some(date) = previous.date().or_else(|| previous.first_of_month())
        && PeriodIndex::of(freq, date, wkst) == anchor_period
    {
        cursor = previous;
    }
    cursor
}

fn passes(rule: &RRule, date: NaiveDate, counts: &DayCounts, month_relative: bool) -> bool {
    let month_ok = rule.by_month.is_empty()
        || u8::try_from(date.month()).is_ok_and(|month| rule.by_month.contains(&month));
    month_ok
        && (rule.by_weekno.is_empty()
            || rule
                .by_weekno
                .iter()
                .any(|week| counts.week_no.matches(i32::from(*week))))
        && (rule.by_yearday.is_empty()
            || rule
                .by_yearday
                .iter()
                .any(|day| counts.year_day.matches(i32::from(*day))))
        && (rule.by_monthday.is_empty()
            || rule
                .by_monthday
                .iter()
                .any(|day| counts.month_day.matches(i32::from(*day))))
        && (!rule.has_by_day()
            || rule
                .by_day()
                .iter()
                .any(|entry| counts.matches_weekday(*entry, month_relative)))
}
