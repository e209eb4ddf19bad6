//! Validation logic for RFC compliance.
//!
//! Recurrence rules are checked here before expansion so that the generators
//! can rely on a legal combination of rule parts.

pub mod rrule;

pub use rrule::{RuleConstraint, RuleError, validate_rrule};
