//! iCalendar core models (RFC 5545) needed by recurrence expansion.
//!
//! These are the normalized values the engine consumes: a recurrence rule with
//! its rule parts already split and typed, and DATE / DATE-TIME values backed
//! by `chrono`.

mod datetime;
mod rrule;

pub use datetime::DateValue;
pub use rrule::{Frequency, RRule, Weekday, WeekdayNum};
