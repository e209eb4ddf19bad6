//! Routing of validated rules to a specialized generator.

use std::fmt;

use crate::rfc::ical::core::{Frequency, RRule};

/// Structural category of a rule; each non-general shape has a dedicated generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Shape {
    /// DAILY without BYSETPOS.
    DailyPlain,
    /// DAILY with BYSETPOS and BYMONTH or BYMONTHDAY.
    DailySetPos,
    /// WEEKLY without BYDAY or BYSETPOS.
    WeeklyPlain,
    /// WEEKLY with bare BYDAY weekdays.
    WeeklyByDay,
    /// WEEKLY with bare BYDAY weekdays and BYSETPOS.
    WeeklyByDaySetPos,
    /// MONTHLY with at most bare BYDAY weekdays.
    MonthlyPlain,
    /// MONTHLY with BYDAY and no BYMONTHDAY.
    MonthlyByDay,
    /// YEARLY without BYDAY, BYWEEKNO or BYYEARDAY.
    YearlyPlain,
    /// YEARLY with BYDAY and BYMONTH, without BYWEEKNO or BYYEARDAY.
    YearlyByDay,
    /// Anything else.
    General,
}

impl Shape {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DailyPlain => "daily-plain",
            Self::DailySetPos => "daily-set-pos",
            Self::WeeklyPlain => "weekly-plain",
            Self::WeeklyByDay => "weekly-by-day",
            Self::WeeklyByDaySetPos => "weekly-by-day-set-pos",
            Self::MonthlyPlain => "monthly-plain",
            Self::MonthlyByDay => "monthly-by-day",
            Self::YearlyPlain => "yearly-plain",
            Self::YearlyByDay => "yearly-by-day",
            Self::General => "general",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ## Summary
/// Classifies a validated rule. The first matching shape wins.
#[must_use]
pub fn classify(rule: &RRule) -> Shape {
    let set_pos = !rule.by_setpos.is_empty();
    let by_day = rule.has_by_day();
    let bare = rule.by_day_is_bare();
    let month_day = !rule.by_monthday.is_empty();
    let by_month = !rule.by_month.is_empty();
    let year_level = !rule.by_weekno.is_empty() || !rule.by_yearday.is_empty();

    match rule.freq {
        Some(Frequency::Daily) if !set_pos => Shape::DailyPlain,
        Some(Frequency::Daily) if by_month || month_day => Shape::DailySetPos,
        Some(Frequency::Weekly) if !by_day && !set_pos => Shape::WeeklyPlain,
        Some(Frequency::Weekly) if by_day && bare && !set_pos => Shape::WeeklyByDay,
        Some(Frequency::Weekly) if by_day && bare => Shape::WeeklyByDaySetPos,
        Some(Frequency::Monthly) if bare && (!set_pos || month_day) => Shape::MonthlyPlain,
        Some(Frequency::Monthly) if by_day && !month_day => Shape::MonthlyByDay,
        Some(Frequency::Yearly) if !by_day && !year_level => Shape::YearlyPlain,
        Some(Frequency::Yearly) if by_day && by_month && !year_level => Shape::YearlyByDay,
        _ => Shape::General,
    }
}
