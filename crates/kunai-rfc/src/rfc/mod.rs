pub mod ical;
pub mod validation;
