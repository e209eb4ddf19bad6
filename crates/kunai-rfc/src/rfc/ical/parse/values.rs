//! Value type parsers for the RECUR, DATE and DATE-TIME values (RFC 5545 §3.3).
//!
//! Error sources are intentionally discarded during parsing (`map_err_ignore`)
//! until richer error types are implemented for value-level parsing.
#![expect(
    clippy::map_err_ignore,
    reason = "Value parsers intentionally discard error sources pending richer error types"
)]

use chrono::{NaiveDate, NaiveTime};

use super::error::{ParseError, ParseErrorKind, ParseResult};
use crate::rfc::ical::core::{DateValue, Frequency, RRule, Weekday, WeekdayNum};

/// Splits a fixed-width run of ASCII digits into a number.
fn digits(s: &str, range: std::ops::Range<usize>) -> Option<u32> {
    let part = s.get(range)?;
    if !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Parses a DATE value (RFC 5545 §3.3.4).
///
/// Format: YYYYMMDD (e.g., "19970714")
///
/// ## Errors
/// Returns an error if the string is not a valid 8-digit calendar date.
pub fn parse_date(s: &str, line: usize, col: usize) -> ParseResult<NaiveDate> {
    let err = || ParseError::new(ParseErrorKind::InvalidDate, line, col).with_context(s);
    if s.len() != 8 {
        return Err(err());
    }

    let year = digits(s, 0..4).ok_or_else(err)?;
    let month = digits(s, 4..6).ok_or_else(err)?;
    let day = digits(s, 6..8).ok_or_else(err)?;

    let year = i32::try_from(year).map_err(|_| err())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(err)
}

/// Parses a TIME value (RFC 5545 §3.3.12).
///
/// Format: HHMMSS[Z] (e.g., "133000", "133000Z"). The UTC designator is
/// accepted and dropped; values are treated as floating.
///
/// ## Errors
/// Returns an error if the string is not a valid 6-digit time.
pub fn parse_time(s: &str, line: usize, col: usize) -> ParseResult<NaiveTime> {
    let err = || ParseError::new(ParseErrorKind::InvalidTime, line, col).with_context(s);
    let time_str = if let Some(stripped) = s.strip_suffix('Z') {
        tracing::trace!(value = s, "Treating UTC time as floating");
        stripped
    } else {
        s
    };

    if time_str.len() != 6 {
        return Err(err());
    }

    let hour = digits(time_str, 0..2).ok_or_else(err)?;
    let minute = digits(time_str, 2..4).ok_or_else(err)?;
    // A leap second folds onto the last representable second.
    let second = digits(time_str, 4..6).ok_or_else(err)?.min(59);

    NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(err)
}

/// Parses a DATE-TIME value (RFC 5545 §3.3.5).
///
/// Format: YYYYMMDD"T"HHMMSS[Z] (e.g., "19970714T133000Z")
///
/// ## Errors
/// Returns an error if the string is not a valid datetime format.
pub fn parse_datetime(s: &str, line: usize, col: usize) -> ParseResult<DateValue> {
    let t_pos = s.find('T').ok_or_else(|| {
        ParseError::new(ParseErrorKind::InvalidDateTime, line, col).with_context(s)
    })?;

    let date = parse_date(&s[..t_pos], line, col)?;
    let time = parse_time(&s[t_pos + 1..], line, col + t_pos + 1)?;

    Ok(DateValue::DateTime(date.and_time(time)))
}

/// Parses either a DATE or a DATE-TIME, choosing by the presence of the `T` separator.
///
/// ## Errors
/// Returns an error if the string is neither a valid DATE nor DATE-TIME.
pub fn parse_date_value(s: &str, line: usize, col: usize) -> ParseResult<DateValue> {
    if s.contains('T') {
        parse_datetime(s, line, col)
    } else {
        parse_date(s, line, col).map(DateValue::Date)
    }
}

/// Parses a RECUR (RRULE) value (RFC 5545 §3.3.10).
///
/// Reported columns point at the start of the offending rule part.
///
/// ## Errors
/// Returns an error if the string is not a valid recurrence rule.
pub fn parse_rrule(s: &str, line: usize, col: usize) -> ParseResult<RRule> {
    let mut rrule = RRule::new();
    let mut offset = 0;

    for part in s.split(';') {
        let part_col = col + offset;
        offset += part.len() + 1;
        if part.trim().is_empty() {
            continue;
        }

        let eq_pos = part.find('=').ok_or_else(|| {
            ParseError::new(ParseErrorKind::InvalidRRule, line, part_col).with_context(part)
        })?;

        let key = part[..eq_pos].trim();
        let value = part[eq_pos + 1..].trim();

        parse_rrule_part(&mut rrule, key, value, line, part_col)?;
    }

    Ok(rrule)
}

/// Parses a single RRULE key-value pair.
fn parse_rrule_part(
    rrule: &mut RRule,
    key: &str,
    value: &str,
    line: usize,
    col: usize,
) -> ParseResult<()> {
    let invalid = || ParseError::new(ParseErrorKind::InvalidRRule, line, col).with_context(key);
    match key.to_ascii_uppercase().as_str() {
        "FREQ" => {
            rrule.freq = Some(Frequency::parse(value).ok_or_else(|| {
                ParseError::new(ParseErrorKind::InvalidFrequency, line, col).with_context(value)
            })?);
        }
        "INTERVAL" => rrule.interval = Some(value.parse().map_err(|_| invalid())?),
        "COUNT" => parse_rrule_count(rrule, value, line, col)?,
        "UNTIL" => parse_rrule_until(rrule, value, line, col)?,
        "WKST" => {
            rrule.wkst = Some(Weekday::parse(value).ok_or_else(|| {
                ParseError::new(ParseErrorKind::InvalidWeekday, line, col).with_context(value)
            })?);
        }
        "BYSECOND" => rrule.by_second = parse_list(value).map_err(|()| invalid())?,
        "BYMINUTE" => rrule.by_minute = parse_list(value).map_err(|()| invalid())?,
        "BYHOUR" => rrule.by_hour = parse_list(value).map_err(|()| invalid())?,
        "BYDAY" => rrule.by_day = Some(parse_byday(value, line, col)?),
        "BYMONTHDAY" => rrule.by_monthday = parse_list(value).map_err(|()| invalid())?,
        "BYYEARDAY" => rrule.by_yearday = parse_list(value).map_err(|()| invalid())?,
        "BYWEEKNO" => rrule.by_weekno = parse_list(value).map_err(|()| invalid())?,
        "BYMONTH" => rrule.by_month = parse_list(value).map_err(|()| invalid())?,
        "BYSETPOS" => rrule.by_setpos = parse_list(value).map_err(|()| invalid())?,
        _ => tracing::trace!(key, "Ignoring unknown RRULE part"),
    }
    Ok(())
}

/// Parses the COUNT component of an RRULE.
fn parse_rrule_count(rrule: &mut RRule, value: &str, line: usize, col: usize) -> ParseResult<()> {
    if rrule.until.is_some() {
        return Err(ParseError::new(
            ParseErrorKind::UntilCountConflict,
            line,
            col,
        ));
    }
    rrule.count = Some(value.parse().map_err(|_| {
        ParseError::new(ParseErrorKind::InvalidRRule, line, col).with_context(value)
    })?);
    Ok(())
}

/// Parses the UNTIL component of an RRULE.
fn parse_rrule_until(rrule: &mut RRule, value: &str, line: usize, col: usize) -> ParseResult<()> {
    if rrule.count.is_some() {
        return Err(ParseError::new(
            ParseErrorKind::UntilCountConflict,
            line,
            col,
        ));
    }
    // UNTIL can be DATE or DATE-TIME
    rrule.until = Some(parse_date_value(value, line, col)?);
    Ok(())
}

/// Parses a comma-separated list of integers.
fn parse_list<T: std::str::FromStr>(s: &str) -> Result<Vec<T>, ()> {
    s.split(',')
        .map(|v| v.trim().parse().map_err(|_| ()))
        .collect()
}

/// Parses a BYDAY value (weekdays with optional ordinals).
///
/// Tokens that do not name a weekday are dropped, so a BYDAY part with no
/// usable token yields an empty list for the validator to reject.
fn parse_byday(s: &str, line: usize, col: usize) -> ParseResult<Vec<WeekdayNum>> {
    let mut days = Vec::new();
    for token in s.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match parse_weekday_num(token, line, col) {
            Ok(day) => days.push(day),
            Err(err) if err.kind == ParseErrorKind::InvalidWeekday => {
                tracing::warn!(token, "Dropping unresolvable BYDAY entry");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(days)
}

/// Parses a single weekday with optional ordinal (e.g., "MO", "1MO", "-1FR").
fn parse_weekday_num(s: &str, line: usize, col: usize) -> ParseResult<WeekdayNum> {
    let invalid_weekday =
        || ParseError::new(ParseErrorKind::InvalidWeekday, line, col).with_context(s);

    // Last two characters should be the weekday
    let split = s.len().checked_sub(2).ok_or_else(invalid_weekday)?;
    let (ordinal_str, weekday_str) = match (s.get(..split), s.get(split..)) {
        (Some(ordinal), Some(weekday)) => (ordinal, weekday),
        _ => return Err(invalid_weekday()),
    };

    let weekday = Weekday::parse(weekday_str).ok_or_else(invalid_weekday)?;

    let ordinal = if ordinal_str.is_empty() {
        None
    } else {
        Some(
            ordinal_str
                .trim_start_matches('+')
                .parse()
                .map_err(|_| {
                    ParseError::new(ParseErrorKind::InvalidRRule, line, col).with_context(s)
                })?,
        )
    };

    Ok(WeekdayNum { ordinal, weekday })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_basic() {
        let date = parse_date("20260123", 1, 1).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 1, 23).unwrap());
    }

    #[test]
    fn parse_date_invalid() {
        assert!(parse_date("2026012", 1, 1).is_err()); // Too short
        assert!(parse_date("20261301", 1, 1).is_err()); // Invalid month
        assert!(parse_date("20230229", 1, 1).is_err()); // Not a leap year
        assert!(parse_date("2026-1-1", 1, 1).is_err());
    }

    #[test]
    fn parse_time_utc_is_floating() {
        let time = parse_time("120000Z", 1, 1).unwrap();
        assert_eq!(time, NaiveTime::from_hms_opt(12, 0, 0).unwrap());
    }

    #[test]
    fn parse_datetime_reports_time_column() {
        let err = parse_datetime("20260123T250000", 1, 10).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidTime);
        assert_eq!(err.column, 19);
    }

    #[test]
    fn parse_date_value_picks_kind() {
        assert!(!parse_date_value("20260123", 1, 1).unwrap().has_time());
        assert!(parse_date_value("20260123T090000", 1, 1).unwrap().has_time());
    }

    #[test]
    fn parse_rrule_basic() {
        let rrule = parse_rrule("FREQ=DAILY;COUNT=10", 1, 1).unwrap();
        assert_eq!(rrule.freq, Some(Frequency::Daily));
        assert_eq!(rrule.count, Some(10));
    }

    #[test]
    fn parse_rrule_weekly_byday() {
        let rrule = parse_rrule("FREQ=WEEKLY;BYDAY=MO,WE,FR", 1, 1).unwrap();
        assert_eq!(rrule.freq, Some(Frequency::Weekly));
        assert_eq!(rrule.by_day().len(), 3);
    }

    #[test]
    fn parse_rrule_monthly_nth() {
        let rrule = parse_rrule("FREQ=MONTHLY;BYDAY=-1FR,+2MO", 1, 1).unwrap();
        assert_eq!(rrule.by_day().len(), 2);
        assert_eq!(rrule.by_day()[0].ordinal, Some(-1));
        assert_eq!(rrule.by_day()[0].weekday, Weekday::Friday);
        assert_eq!(rrule.by_day()[1].ordinal, Some(2));
    }

    #[test]
    fn parse_rrule_all_list_parts() {
        let rrule = parse_rrule(
            "FREQ=YEARLY;INTERVAL=2;BYMONTH=1,2;BYMONTHDAY=-1;BYYEARDAY=100,-1;BYWEEKNO=20;BYSETPOS=-1;WKST=SU;BYHOUR=9",
            1,
            1,
        )
        .unwrap();
        assert_eq!(rrule.interval, Some(2));
        assert_eq!(rrule.by_month, vec![1, 2]);
        assert_eq!(rrule.by_monthday, vec![-1]);
        assert_eq!(rrule.by_yearday, vec![100, -1]);
        assert_eq!(rrule.by_weekno, vec![20]);
        assert_eq!(rrule.by_setpos, vec![-1]);
        assert_eq!(rrule.wkst, Some(Weekday::Sunday));
        assert_eq!(rrule.by_hour, vec![9]);
    }

    #[test]
    fn parse_rrule_until_count_conflict() {
        let result = parse_rrule("FREQ=DAILY;COUNT=10;UNTIL=20260131", 1, 1);
        let err = result.unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UntilCountConflict);
        assert_eq!(err.column, 21);
    }

    #[test]
    fn parse_rrule_unresolvable_byday_is_kept_empty() {
        let rrule = parse_rrule("FREQ=WEEKLY;BYDAY=XX,YY", 1, 1).unwrap();
        assert_eq!(rrule.by_day, Some(Vec::new()));
    }

    #[test]
    fn parse_rrule_rejects_bad_frequency() {
        let err = parse_rrule("FREQ=FORTNIGHTLY", 1, 1).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidFrequency);
    }

    #[test]
    fn parse_rrule_round_trips_through_display() {
        let text = "FREQ=MONTHLY;UNTIL=20241231;BYDAY=MO,TU,WE,TH,FR;BYSETPOS=-1";
        let rrule = parse_rrule(text, 1, 1).unwrap();
        assert_eq!(rrule.to_string(), text);
    }
}
