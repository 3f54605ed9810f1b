//! Date normalization for spreadsheet cells.
//!
//! Sheet columns mix dash and slash month-day-year formats within the same
//! column, plus whatever a permissive parser can make sense of. Parsing tries
//! a fixed fallback chain and reports failure as `None` rather than erroring;
//! empty cells and spreadsheet null sentinels ("nan", "None", "NaT", "NaN")
//! are unparseable, not errors.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;

use crate::models::{fields, Record};

/// Canonical output format for date-only fields.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Canonical output format for the pickup timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Null-ish sentinel strings that spreadsheet exports produce for empty cells.
const NULL_SENTINELS: [&str; 4] = ["nan", "None", "NaT", "NaN"];

/// Formats tried by the permissive general parse, month before day.
/// Datetime layouts first so a time-of-day component survives when present.
const GENERAL_FORMATS: [&str; 12] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m-%d-%Y %H:%M:%S",
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%m/%d/%y",
    "%m-%d-%y",
    "%B %d, %Y",
    "%b %d, %Y",
];

/// Trim the raw cell and collapse null sentinels to the empty string.
fn normalize_sentinels(raw: &str) -> &str {
    let trimmed = raw.trim();
    if NULL_SENTINELS.contains(&trimmed) {
        ""
    } else {
        trimmed
    }
}

/// Parse a date-only cell: strict `MM-DD-YYYY`, then strict `MM/DD/YYYY`,
/// then the permissive month-first general parse. Each stage only runs on
/// values all prior stages rejected.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let value = normalize_sentinels(raw);
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value, "%m-%d-%Y")
        .or_else(|_| NaiveDate::parse_from_str(value, "%m/%d/%Y"))
        .ok()
        .or_else(|| parse_general(value).map(|dt| dt.date()))
}

/// Parse a timestamp cell with the permissive general parse only.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let value = normalize_sentinels(raw);
    if value.is_empty() {
        return None;
    }
    parse_general(value)
}

/// Permissive general parse with month-before-day precedence.
fn parse_general(value: &str) -> Option<NaiveDateTime> {
    for format in GENERAL_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
        if let Ok(d) = NaiveDate::parse_from_str(value, format) {
            return Some(NaiveDateTime::new(d, NaiveTime::MIN));
        }
    }
    None
}

/// Rewrite the date fields of a record to canonical strings in place.
///
/// Unparseable values become the empty string so the row stays representable
/// as plain JSON all the way to the response.
pub fn normalize_record_dates(record: &mut Record) {
    for field in [fields::ORDER_DATE, fields::DUE_PICKUP_DATE, fields::DUE_DATE] {
        if let Some(value) = record.get(field) {
            let normalized = parse_date(&value_as_text(value))
                .map(|d| d.format(DAY_FORMAT).to_string())
                .unwrap_or_default();
            record.insert(field.to_string(), Value::String(normalized));
        }
    }
    if let Some(value) = record.get(fields::PICKUP_TIMESTAMP) {
        let normalized = parse_timestamp(&value_as_text(value))
            .map(|dt| dt.format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_default();
        record.insert(fields::PICKUP_TIMESTAMP.to_string(), Value::String(normalized));
    }
}

/// Render a JSON cell as the text a spreadsheet user would see.
pub fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
