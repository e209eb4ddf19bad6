//! Parsers for the textual values the engine is fed with.

mod error;
mod values;

pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use values::{parse_date, parse_date_value, parse_datetime, parse_rrule, parse_time};
