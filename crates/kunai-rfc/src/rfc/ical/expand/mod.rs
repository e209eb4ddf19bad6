//! Recurrence expansion: turns a rule, an anchor and a window into concrete occurrences.
//!
//! Rules are classified into a [`Shape`]; common shapes run a specialized
//! generator and everything else falls back to the general one. All generators
//! feed a shared emitter, so they produce identical occurrence sets.

mod classify;
pub mod cursor;
mod fast;
mod general;
mod occurrence;
mod setpos;
pub mod table;

use std::cmp::Ordering;

use kunai_core::config::ExpansionConfig;
use kunai_core::error::CoreError;

pub use classify::{Shape, classify};
pub use occurrence::OccurrenceSet;
pub use setpos::select_positions;

use self::occurrence::Emitter;
use crate::error::RfcResult;
use crate::rfc::ical::core::{DateValue, RRule};
use crate::rfc::validation::validate_rrule;

/// Inclusive range of time occurrences are collected for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionWindow {
    pub start: DateValue,
    pub end: DateValue,
}

impl ExpansionWindow {
    #[must_use]
    pub const fn new(start: DateValue, end: DateValue) -> Self {
        Self { start, end }
    }

    /// Whether `value` lies inside the window, compared at the coarser resolution.
    #[must_use]
    pub fn contains(&self, value: DateValue) -> bool {
        value.compare(self.start) != Ordering::Less && value.compare(self.end) != Ordering::Greater
    }

    /// Whether the window ends before it starts.
    #[must_use]
    pub fn is_reversed(&self) -> bool {
        self.end.compare(self.start) == Ordering::Less
    }
}

/// Tuning knobs for an expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionOptions {
    /// Years past the window end that stand in for UNTIL on unbounded rules.
    pub emergency_horizon_years: u32,
    /// Skip classification and always run the general generator.
    pub force_general: bool,
}

impl Default for ExpansionOptions {
    fn default() -> Self {
        Self {
            emergency_horizon_years: kunai_core::config::DEFAULT_EMERGENCY_HORIZON_YEARS,
            force_general: false,
        }
    }
}

impl ExpansionOptions {
    #[must_use]
    pub const fn with_force_general(mut self, force_general: bool) -> Self {
        self.force_general = force_general;
        self
    }
}

impl TryFrom<&ExpansionConfig> for ExpansionOptions {
    type Error = CoreError;

    fn try_from(config: &ExpansionConfig) -> Result<Self, Self::Error> {
        if config.emergency_horizon_years == 0 {
            return Err(CoreError::ConfigError(
                "expansion.emergency_horizon_years must be at least 1".to_owned(),
            ));
        }
        Ok(Self {
            emergency_horizon_years: config.emergency_horizon_years,
            force_general: false,
        })
    }
}

/// ## Summary
/// Expands an already validated rule.
///
/// The anchor counts as the first occurrence when it matches the rule. Results
/// carry the anchor's value kind and time of day. The caller is responsible for
/// having validated `rule`; use [`expand_rule`] otherwise.
#[must_use]
pub fn generate(
    rule: &RRule,
    anchor: DateValue,
    window: ExpansionWindow,
    options: &ExpansionOptions,
) -> OccurrenceSet {
    let shape = if options.force_general {
        Shape::General
    } else {
        classify(rule)
    };
    tracing::debug!(rule = %rule, %anchor, %shape, "Expanding recurrence rule");

    let mut emitter = Emitter::new(rule, anchor, window, options);
    match shape {
        Shape::DailyPlain => fast::daily::plain(rule, &mut emitter),
        Shape::DailySetPos => fast::daily::set_pos(rule, &mut emitter),
        Shape::WeeklyPlain => fast::weekly::plain(rule, &mut emitter),
        Shape::WeeklyByDay => fast::weekly::by_day(rule, &mut emitter),
        Shape::WeeklyByDaySetPos => fast::weekly::by_day_set_pos(rule, &mut emitter),
        Shape::MonthlyPlain => fast::monthly::plain(rule, &mut emitter),
        Shape::MonthlyByDay => fast::monthly::by_day(rule, &mut emitter),
        Shape::YearlyPlain => fast::yearly::plain(rule, &mut emitter),
        Shape::YearlyByDay => fast::yearly::by_day(rule, &mut emitter),
        Shape::General => general::expand(rule, &mut emitter),
    }
    emitter.finish()
}

/// ## Summary
/// Validates `rule` and expands it.
///
/// ## Errors
/// Returns an error if the rule violates a structural constraint.
pub fn expand_rule(
    rule: &RRule,
    anchor: DateValue,
    window: ExpansionWindow,
    options: &ExpansionOptions,
) -> RfcResult<OccurrenceSet> {
    validate_rrule(rule)?;
    Ok(generate(rule, anchor, window, options))
}

/// ## Summary
/// Validates `rule`, expands it and merges the occurrences into `into`.
///
/// ## Errors
/// Returns an error if the rule violates a structural constraint; `into` is left untouched.
pub fn expand_into(
    rule: &RRule,
    anchor: DateValue,
    window: ExpansionWindow,
    options: &ExpansionOptions,
    into: &mut OccurrenceSet,
) -> RfcResult<()> {
    let occurrences = expand_rule(rule, anchor, window, options)?;
    into.merge(occurrences);
    Ok(())
}
