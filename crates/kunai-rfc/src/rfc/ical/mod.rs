//! iCalendar (RFC 5545) recurrence support.

pub mod core;
pub mod expand;
pub mod parse;
