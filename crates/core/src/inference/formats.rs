//! Recognition of typed values carried as text

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Number;

/// Recognised timestamp layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateFormat {
    /// ISO 8601 date (YYYY-MM-DD)
    Date,
    /// ISO 8601 date-time (YYYY-MM-DDTHH:MM:SS with optional fraction and offset)
    DateTime,
    /// RFC 2822 (Tue, 1 Jul 2003 10:52:37 +0200)
    Rfc2822,
}

static DATE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

static DATETIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:?\d{2})?$").unwrap()
});

static RFC2822_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z][a-z]{2}, )?\d{1,2} [A-Z][a-z]{2} \d{4} \d{2}:\d{2}(:\d{2})? ([+-]\d{4}|[A-Z]{1,3})$")
        .unwrap()
});

// JSON number grammar, so "007" and "1." stay text
static NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?(0|[1-9]\d*)(\.\d+)?([eE][+-]?\d+)?$").unwrap());

/// Detect the timestamp layout of a string, if it parses as one
pub fn detect_date_format(value: &str) -> Option<DateFormat> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    // DateTime before Date (more specific)
    let format = if DATETIME_REGEX.is_match(value) {
        DateFormat::DateTime
    } else if DATE_REGEX.is_match(value) {
        DateFormat::Date
    } else if RFC2822_REGEX.is_match(value) {
        DateFormat::Rfc2822
    } else {
        return None;
    };

    parse_with(value, format).map(|_| format)
}

/// Parse a recognised timestamp; naive values are taken as UTC
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    detect_date_format(trimmed).and_then(|format| parse_with(trimmed, format))
}

fn parse_with(value: &str, format: DateFormat) -> Option<DateTime<Utc>> {
    match format {
        DateFormat::Date => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc()),
        DateFormat::DateTime => {
            if let Ok(parsed) = DateTime::parse_from_rfc3339(&value.replacen(' ', "T", 1)) {
                return Some(parsed.with_timezone(&Utc));
            }
            // Offsets without a colon, e.g. +0530
            if let Ok(parsed) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z") {
                return Some(parsed.with_timezone(&Utc));
            }
            if let Ok(parsed) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f%z") {
                return Some(parsed.with_timezone(&Utc));
            }
            ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
                .iter()
                .find_map(|layout| NaiveDateTime::parse_from_str(value, layout).ok())
                .map(|naive| naive.and_utc())
        }
        DateFormat::Rfc2822 => DateTime::parse_from_rfc2822(value)
            .ok()
            .map(|parsed| parsed.with_timezone(&Utc)),
    }
}

/// Parse numeric text using JSON number grammar
pub fn parse_number(value: &str) -> Option<Number> {
    let value = value.trim();
    if !NUMBER_REGEX.is_match(value) {
        return None;
    }
    if let Ok(integer) = value.parse::<i64>() {
        return Some(Number::from(integer));
    }
    if let Ok(integer) = value.parse::<u64>() {
        return Some(Number::from(integer));
    }
    value.parse::<f64>().ok().and_then(Number::from_f64)
}

/// Parse `true` / `false` in any letter case
pub fn parse_boolean(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
