//! Filter predicates over merged records.
//!
//! Each `FilterSpec` field is an independent predicate; present predicates
//! are ANDed, and the comma-separated list fields are an OR over their
//! trimmed tokens. A field whose tokens all trim away imposes no constraint.
//! Filtering is pure and never mutates its input.

use chrono::NaiveDate;

use crate::dates::{self, value_as_text, DAY_FORMAT};
use crate::models::{fields, FilterSpec, Record, RecordSet};

/// Apply every present predicate of `spec` to `records`.
pub fn apply(records: &[Record], spec: &FilterSpec) -> RecordSet {
    let date_start = spec.date_start.as_deref().and_then(dates::parse_date);
    let date_end = spec.date_end.as_deref().and_then(dates::parse_date);
    let order_types = tokens(spec.order_type.as_deref());
    let products: Vec<String> = tokens(spec.product.as_deref())
        .into_iter()
        .map(|t| t.to_lowercase())
        .collect();
    // Unparseable pickup tokens are dropped rather than failing the filter.
    let pickup_days: Vec<NaiveDate> = tokens(spec.pickup_dates.as_deref())
        .iter()
        .filter_map(|t| dates::parse_date(t))
        .collect();

    records
        .iter()
        .filter(|record| {
            matches_date_range(record, date_start, date_end)
                && matches_order_type(record, &order_types)
                && matches_product(record, &products)
                && matches_pickup_days(record, &pickup_days)
        })
        .cloned()
        .collect()
}

/// Split a comma-separated spec field into trimmed, non-empty tokens.
fn tokens(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalized order date of a record, if it parsed during ingestion.
fn order_day(record: &Record) -> Option<NaiveDate> {
    record
        .get(fields::ORDER_DATE)
        .map(value_as_text)
        .and_then(|s| NaiveDate::parse_from_str(&s, DAY_FORMAT).ok())
}

/// Inclusive bounds on the order date. `end` covers its whole calendar day.
/// Records whose order date failed to parse never match a bounded range.
fn matches_date_range(record: &Record, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    if start.is_none() && end.is_none() {
        return true;
    }
    let Some(day) = order_day(record) else {
        return false;
    };
    start.map(|s| day >= s).unwrap_or(true) && end.map(|e| day <= e).unwrap_or(true)
}

/// Exact, case-sensitive match against any token.
fn matches_order_type(record: &Record, types: &[String]) -> bool {
    if types.is_empty() {
        return true;
    }
    let value = record.get(fields::ORDER_TYPE).map(value_as_text).unwrap_or_default();
    types.iter().any(|t| *t == value)
}

/// Case-insensitive substring match against any token.
fn matches_product(record: &Record, products: &[String]) -> bool {
    if products.is_empty() {
        return true;
    }
    let description = record
        .get(fields::PRODUCT_DESCRIPTION)
        .map(value_as_text)
        .unwrap_or_default()
        .to_lowercase();
    products.iter().any(|p| description.contains(p))
}

/// Calendar-day equality of the due pickup date against any parsed token.
fn matches_pickup_days(record: &Record, days: &[NaiveDate]) -> bool {
    if days.is_empty() {
        return true;
    }
    let Some(pickup) = record
        .get(fields::DUE_PICKUP_DATE)
        .map(value_as_text)
        .and_then(|s| NaiveDate::parse_from_str(&s, DAY_FORMAT).ok())
    else {
        return false;
    };
    days.contains(&pickup)
}
