//! RFC 5545 recurrence rules: value model, parsing, validation and expansion.
//!
//! The expansion entry points live in [`rfc::ical::expand`]; most callers want
//! [`expand_rule`], which validates a rule and materializes its occurrences
//! inside a window.

pub mod error;
pub mod rfc;

pub use rfc::ical::expand::{
    ExpansionOptions, ExpansionWindow, OccurrenceSet, Shape, classify, expand_into, expand_rule,
    generate,
};
pub use rfc::validation::{RuleConstraint, RuleError, validate_rrule};
