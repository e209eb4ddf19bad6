//! ## Summary
//! Pre-flight legality checks for recurrence rules (RFC 5545 §3.3.10).
//!
//! The expansion engine trusts a rule that passed [`validate_rrule`]; none of
//! the generators re-check these constraints.

use std::fmt;

use crate::rfc::ical::core::{Frequency, RRule};

/// ## Summary
/// Identifier of the rule constraint a recurrence rule violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleConstraint {
    /// FREQ is absent.
    MissingFrequency,
    /// FREQ is SECONDLY, MINUTELY or HOURLY.
    UnsupportedFrequency,
    /// BYDAY was given but no entry names a weekday.
    EmptyByDay,
    /// BYDAY carries an ordinal while FREQ is neither MONTHLY nor YEARLY.
    ByDayOrdinalFrequency,
    /// BYDAY carries an ordinal under YEARLY together with BYWEEKNO.
    ByDayOrdinalWithWeekNo,
    /// BYMONTHDAY with FREQ=WEEKLY.
    ByMonthDayWithWeekly,
    /// BYYEARDAY with FREQ other than YEARLY.
    ByYearDayFrequency,
    /// BYWEEKNO with FREQ other than YEARLY.
    ByWeekNoFrequency,
    /// Both COUNT and UNTIL are set.
    CountWithUntil,
    /// INTERVAL is zero.
    ZeroInterval,
    /// COUNT is zero.
    ZeroCount,
    /// A BYDAY ordinal is zero or beyond ±53.
    ByDayOrdinalRange,
    /// A BYMONTH value is outside 1..=12.
    ByMonthRange,
    /// A BYMONTHDAY value is zero or beyond ±31.
    ByMonthDayRange,
    /// A BYYEARDAY value is zero or beyond ±366.
    ByYearDayRange,
    /// A BYWEEKNO value is zero or beyond ±53.
    ByWeekNoRange,
    /// A BYSETPOS value is zero or beyond ±366.
    BySetPosRange,
    /// A BYHOUR, BYMINUTE or BYSECOND value is out of range.
    ByTimeRange,
}

impl RuleConstraint {
    /// Returns the stable identifier of this constraint.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingFrequency => "freq-required",
            Self::UnsupportedFrequency => "freq-unsupported",
            Self::EmptyByDay => "byday-empty",
            Self::ByDayOrdinalFrequency => "byday-ordinal-freq",
            Self::ByDayOrdinalWithWeekNo => "byday-ordinal-byweekno",
            Self::ByMonthDayWithWeekly => "bymonthday-weekly",
            Self::ByYearDayFrequency => "byyearday-freq",
            Self::ByWeekNoFrequency => "byweekno-freq",
            Self::CountWithUntil => "count-until",
            Self::ZeroInterval => "interval-zero",
            Self::ZeroCount => "count-zero",
            Self::ByDayOrdinalRange => "byday-ordinal-range",
            Self::ByMonthRange => "bymonth-range",
            Self::ByMonthDayRange => "bymonthday-range",
            Self::ByYearDayRange => "byyearday-range",
            Self::ByWeekNoRange => "byweekno-range",
            Self::BySetPosRange => "bysetpos-range",
            Self::ByTimeRange => "bytime-range",
        }
    }
}

impl fmt::Display for RuleConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ## Summary
/// A recurrence rule failed pre-flight validation.
///
/// Carries the violated constraint and the offending rule rendered as RRULE text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("constraint {constraint} violated by rule \"{rule}\"")]
pub struct RuleError {
    pub constraint: RuleConstraint,
    pub rule: String,
}

impl RuleError {
    fn new(constraint: RuleConstraint, rule: &RRule) -> Self {
        Self {
            constraint,
            rule: rule.to_string(),
        }
    }
}

fn all_in<T: Copy + Into<i32>>(values: &[T], limit: i32, signed: bool) -> bool {
    values.iter().all(|value| {
        let value: i32 = (*value).into();
        if signed {
            value != 0 && (-limit..=limit).contains(&value)
        } else {
            (1..=limit).contains(&value)
        }
    })
}

/// ## Summary
/// Checks a recurrence rule for illegal rule-part combinations and out-of-range values.
///
/// ## Errors
/// Returns a [`RuleError`] naming the first violated [`RuleConstraint`].
pub fn validate_rrule(rule: &RRule) -> Result<(), RuleError> {
    let fail = |constraint: RuleConstraint| {
        tracing::debug!(%constraint, rule = %rule, "Rejecting recurrence rule");
        Err(RuleError::new(constraint, rule))
    };

    let Some(freq) = rule.freq else {
        return fail(RuleConstraint::MissingFrequency);
    };
    if !freq.is_day_or_coarser() {
        return fail(RuleConstraint::UnsupportedFrequency);
    }

    let has_ordinal = rule.by_day().iter().any(|day| day.ordinal.is_some());
    if rule.by_day.as_ref().is_some_and(Vec::is_empty) {
        return fail(RuleConstraint::EmptyByDay);
    }
    if has_ordinal && !matches!(freq, Frequency::Monthly | Frequency::Yearly) {
        return fail(RuleConstraint::ByDayOrdinalFrequency);
    }
    if has_ordinal && freq == Frequency::Yearly && !rule.by_weekno.is_empty() {
        return fail(RuleConstraint::ByDayOrdinalWithWeekNo);
    }
    if freq == Frequency::Weekly && !rule.by_monthday.is_empty() {
        return fail(RuleConstraint::ByMonthDayWithWeekly);
    }
    if freq != Frequency::Yearly && !rule.by_yearday.is_empty() {
        return fail(RuleConstraint::ByYearDayFrequency);
    }
    if freq != Frequency::Yearly && !rule.by_weekno.is_empty() {
        return fail(RuleConstraint::ByWeekNoFrequency);
    }

    if rule.count.is_some() && rule.until.is_some() {
        return fail(RuleConstraint::CountWithUntil);
    }
    if rule.interval == Some(0) {
        return fail(RuleConstraint::ZeroInterval);
    }
    if rule.count == Some(0) {
        return fail(RuleConstraint::ZeroCount);
    }

    let ordinals: Vec<i8> = rule.by_day().iter().filter_map(|day| day.ordinal).collect();
    let ranges = [
        (all_in(&ordinals, 53, true), RuleConstraint::ByDayOrdinalRange),
        (all_in(&rule.by_month, 12, false), RuleConstraint::ByMonthRange),
        (all_in(&rule.by_monthday, 31, true), RuleConstraint::ByMonthDayRange),
        (all_in(&rule.by_yearday, 366, true), RuleConstraint::ByYearDayRange),
        (all_in(&rule.by_weekno, 53, true), RuleConstraint::ByWeekNoRange),
        (all_in(&rule.by_setpos, 366, true), RuleConstraint::BySetPosRange),
        (
            rule.by_hour.iter().all(|h| *h <= 23)
                && rule.by_minute.iter().all(|m| *m <= 59)
                && rule.by_second.iter().all(|s| *s <= 60),
            RuleConstraint::ByTimeRange,
        ),
    ];
    if let Some((_, constraint)) = ranges.into_iter().find(|(ok, _)| !ok) {
        return fail(constraint);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::ical::core::{DateValue, Weekday, WeekdayNum};

    fn constraint_of(rule: &RRule) -> Option<RuleConstraint> {
        validate_rrule(rule).err().map(|err| err.constraint)
    }

    #[test]
    fn accepts_plain_rules() {
        for rule in [
            RRule::daily(),
            RRule::weekly(),
            RRule::monthly(),
            RRule::yearly(),
        ] {
            assert_eq!(constraint_of(&rule.with_count(3)), None);
        }
    }

    #[test_log::test]
    fn rejects_missing_frequency() {
        let err = validate_rrule(&RRule::new().with_count(3)).unwrap_err();
        assert_eq!(err.constraint, RuleConstraint::MissingFrequency);
        assert_eq!(err.rule, "COUNT=3");
    }

    #[test]
    fn rejects_sub_daily_frequency() {
        let rule = RRule {
            freq: Some(Frequency::Hourly),
            ..RRule::default()
        };
        assert_eq!(
            constraint_of(&rule),
            Some(RuleConstraint::UnsupportedFrequency)
        );
    }

    #[test]
    fn rejects_byday_without_weekdays() {
        let rule = RRule::weekly().with_by_day(Vec::new());
        assert_eq!(constraint_of(&rule), Some(RuleConstraint::EmptyByDay));
    }

    #[test]
    fn byday_ordinal_needs_monthly_or_yearly() {
        let nth = vec![WeekdayNum::nth(2, Weekday::Monday)];
        assert_eq!(
            constraint_of(&RRule::weekly().with_by_day(nth.clone())),
            Some(RuleConstraint::ByDayOrdinalFrequency)
        );
        assert_eq!(
            constraint_of(&RRule::daily().with_by_day(nth.clone())),
            Some(RuleConstraint::ByDayOrdinalFrequency)
        );
        assert_eq!(constraint_of(&RRule::monthly().with_by_day(nth.clone())), None);
        assert_eq!(constraint_of(&RRule::yearly().with_by_day(nth)), None);
    }

    #[test]
    fn yearly_ordinal_byday_conflicts_with_byweekno() {
        let rule = RRule::yearly()
            .with_by_weekno(vec![20])
            .with_by_day(vec![WeekdayNum::nth(1, Weekday::Monday)]);
        assert_eq!(
            constraint_of(&rule),
            Some(RuleConstraint::ByDayOrdinalWithWeekNo)
        );

        let bare = RRule::yearly()
            .with_by_weekno(vec![20])
            .with_by_day(vec![WeekdayNum::every(Weekday::Monday)]);
        assert_eq!(constraint_of(&bare), None);
    }

    #[test]
    fn frequency_restricted_parts() {
        assert_eq!(
            constraint_of(&RRule::weekly().with_by_monthday(vec![1])),
            Some(RuleConstraint::ByMonthDayWithWeekly)
        );
        assert_eq!(
            constraint_of(&RRule::monthly().with_by_yearday(vec![1])),
            Some(RuleConstraint::ByYearDayFrequency)
        );
        assert_eq!(
            constraint_of(&RRule::monthly().with_by_weekno(vec![1])),
            Some(RuleConstraint::ByWeekNoFrequency)
        );
        assert_eq!(constraint_of(&RRule::yearly().with_by_weekno(vec![-1])), None);
    }

    #[test]
    fn rejects_count_with_until() {
        let mut rule = RRule::daily().with_count(2);
        rule.until = DateValue::date(2024, 1, 1);
        assert_eq!(constraint_of(&rule), Some(RuleConstraint::CountWithUntil));
    }

    #[test]
    fn rejects_zero_interval_and_count() {
        assert_eq!(
            constraint_of(&RRule::daily().with_interval(0)),
            Some(RuleConstraint::ZeroInterval)
        );
        assert_eq!(
            constraint_of(&RRule::daily().with_count(0)),
            Some(RuleConstraint::ZeroCount)
        );
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert_eq!(
            constraint_of(&RRule::yearly().with_by_month(vec![13])),
            Some(RuleConstraint::ByMonthRange)
        );
        assert_eq!(
            constraint_of(&RRule::monthly().with_by_monthday(vec![0])),
            Some(RuleConstraint::ByMonthDayRange)
        );
        assert_eq!(
            constraint_of(&RRule::monthly().with_by_monthday(vec![-32])),
            Some(RuleConstraint::ByMonthDayRange)
        );
        assert_eq!(
            constraint_of(&RRule::yearly().with_by_yearday(vec![367])),
            Some(RuleConstraint::ByYearDayRange)
        );
        assert_eq!(
            constraint_of(&RRule::yearly().with_by_weekno(vec![54])),
            Some(RuleConstraint::ByWeekNoRange)
        );
        assert_eq!(
            constraint_of(&RRule::monthly().with_by_monthday(vec![1]).with_by_setpos(vec![0])),
            Some(RuleConstraint::BySetPosRange)
        );
        let mut hourly = RRule::daily();
        hourly.by_hour = vec![24];
        assert_eq!(constraint_of(&hourly), Some(RuleConstraint::ByTimeRange));
    }

    #[test]
    fn error_display_names_constraint_and_rule() {
        let err = validate_rrule(&RRule::monthly().with_by_weekno(vec![1])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "constraint byweekno-freq violated by rule \"FREQ=MONTHLY;BYWEEKNO=1\""
        );
    }
}
