//! Date Revival Module
//!
//! Date-times degrade to strings in the textual payload. This pass turns
//! strings shaped like ISO-8601 date-times back into date-time values.

use chrono::DateTime;
use once_cell::sync::Lazy;
use regex::Regex;

use super::Value;

/// Year, zero-padded month and day, `T`, hour:minute:second, fractional
/// seconds, then a `±hh:mm` offset or `Z`.
static DATE_TIME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-[01]\d-[0-3]\dT[0-2]\d:[0-5]\d:[0-5]\d\.\d+([+-][0-2]\d:[0-5]\d|Z)$")
        .expect("date-time pattern is valid")
});

/// Returns true when `s` has the shape of a serialized date-time.
pub fn looks_like_datetime(s: &str) -> bool {
    DATE_TIME_PATTERN.is_match(s)
}

/// Walks every field of every object (and every array element) and replaces
/// date-time shaped strings with parsed date-times.
///
/// The root itself is a container walk: a bare top-level string is returned
/// untouched. Strings that match the pattern but are not real calendar
/// instants (month 19, hour 29) stay strings.
pub fn revive_dates(value: Value) -> Value {
    match value {
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(k, v)| (k, revive_field(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(revive_field).collect()),
        other => other,
    }
}

fn revive_field(value: Value) -> Value {
    match value {
        Value::String(s) if looks_like_datetime(&s) => match DateTime::parse_from_rfc3339(&s) {
            Ok(dt) => Value::DateTime(dt),
            Err(_) => Value::String(s),
        },
        container @ (Value::Object(_) | Value::Array(_)) => revive_dates(container),
        scalar => scalar,
    }
}
