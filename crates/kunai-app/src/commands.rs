use anyhow::Context;
use chrono::Days;
use kunai_core::config::Settings;
use kunai_core::error::CoreError;
use kunai_rfc::rfc::ical::core::DateValue;
use kunai_rfc::rfc::ical::parse::{parse_date_value, parse_rrule};
use kunai_rfc::{ExpansionOptions, ExpansionWindow, Shape, classify as classify_rule, expand_rule};
use serde::Serialize;

pub struct ExpandArgs<'a> {
    pub rule: &'a str,
    pub anchor: &'a str,
    pub from: Option<&'a str>,
    pub to: Option<&'a str>,
    pub json: bool,
    pub force_general: bool,
}

#[derive(Serialize)]
struct ExpandOutput<'a> {
    shape: Shape,
    window: [String; 2],
    occurrences: Vec<&'a str>,
}

#[derive(Serialize)]
struct ClassifyOutput {
    rule: String,
    shape: Shape,
}

/// ## Summary
/// Expands a rule given on the command line and renders the occurrences.
///
/// ## Errors
/// Returns an error if an argument does not parse, the window is reversed,
/// the configuration is unusable, or the rule fails validation.
pub fn expand(config: &Settings, args: &ExpandArgs<'_>) -> anyhow::Result<String> {
    let rule = parse_rrule(args.rule, 1, 1).context("Failed to parse --rule")?;
    let anchor = parse_date_value(args.anchor, 1, 1).context("Failed to parse --anchor")?;
    let start = if let Some(from) = args.from {
        parse_date_value(from, 1, 1).context("Failed to parse --from")?
    } else {
        anchor
    };
    let end = if let Some(to) = args.to {
        parse_date_value(to, 1, 1).context("Failed to parse --to")?
    } else {
        add_days(start, u64::from(config.expansion.default_window_days))
            .ok_or_else(|| CoreError::InvalidInput("window end out of range".to_owned()))?
    };

    let window = ExpansionWindow::new(start, end);
    if window.is_reversed() {
        return Err(CoreError::InvalidInput(format!(
            "window ends ({end}) before it starts ({start})"
        ))
        .into());
    }

    let options =
        ExpansionOptions::try_from(&config.expansion)?.with_force_general(args.force_general);
    let shape = if args.force_general {
        Shape::General
    } else {
        classify_rule(&rule)
    };
    let occurrences = expand_rule(&rule, anchor, window, &options)?;
    tracing::info!(
        %shape,
        occurrences = occurrences.len(),
        "Expanded rule"
    );

    if args.json {
        let output = ExpandOutput {
            shape,
            window: [start.key(), end.key()],
            occurrences: occurrences.keys().collect(),
        };
        return Ok(serde_json::to_string_pretty(&output)?);
    }
    Ok(occurrences.keys().collect::<Vec<_>>().join("\n"))
}

/// ## Summary
/// Reports which generator a rule would run on.
///
/// ## Errors
/// Returns an error if the rule does not parse.
pub fn classify(rule: &str, json: bool) -> anyhow::Result<String> {
    let parsed = parse_rrule(rule, 1, 1).context("Failed to parse --rule")?;
    let shape = classify_rule(&parsed);
    if json {
        let output = ClassifyOutput {
            rule: parsed.to_string(),
            shape,
        };
        return Ok(serde_json::to_string_pretty(&output)?);
    }
    Ok(shape.to_string())
}

fn add_days(value: DateValue, days: u64) -> Option<DateValue> {
    match value {
        DateValue::Date(date) => date.checked_add_days(Days::new(days)).map(DateValue::Date),
        DateValue::DateTime(datetime) => datetime
            .checked_add_days(Days::new(days))
            .map(DateValue::DateTime),
    }
}
