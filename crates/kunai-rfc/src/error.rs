use thiserror::Error;

use crate::rfc::ical::parse::ParseError;
use crate::rfc::validation::RuleError;

/// RFC parsing, validation and expansion errors
#[derive(Error, Debug)]
pub enum RfcError {
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error("RRule validation error: {0}")]
    RuleValidationError(#[from] RuleError),
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;
