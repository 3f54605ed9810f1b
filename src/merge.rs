//! Joining order rows with their line-item rows.
//!
//! Both spreadsheet tabs carry an `OrderID` column whose values vary in case
//! and padding, so the key is normalized (trim + uppercase) on both sides
//! before joining. The join is an inner join: orders with no line items are
//! dropped, matching how the dashboard has always reported. When either input
//! is missing the key column the join is skipped and the orders pass through
//! unmodified, so a malformed sheet degrades instead of failing the request.

use std::collections::HashMap;

use serde_json::Value;
use tracing::warn;

use crate::dates::value_as_text;
use crate::models::{fields, Record, RecordSet};

/// Suffix applied to item-side columns that collide with an order column.
const ITEM_SUFFIX: &str = "_product";

/// Normalized join key for a record, if it has one.
fn join_key(record: &Record) -> Option<String> {
    record
        .get(fields::ORDER_ID)
        .map(|v| value_as_text(v).trim().to_uppercase())
        .filter(|k| !k.is_empty())
}

/// True when at least one record in the set carries the join key column.
fn has_join_key(records: &RecordSet) -> bool {
    records.iter().any(|r| r.contains_key(fields::ORDER_ID))
}

/// Inner-join line items onto orders by normalized `OrderID`.
///
/// Output rows hold the order's columns first, then the item's columns with
/// `_product` suffixing on name collisions. The normalized key replaces the
/// raw one in every output row.
pub fn merge(orders: RecordSet, items: RecordSet) -> RecordSet {
    if !has_join_key(&orders) || !has_join_key(&items) {
        warn!("OrderID column missing from one input; returning orders unmerged");
        return orders;
    }

    // Bucket items by normalized key, preserving row order within each order.
    let mut items_by_key: HashMap<String, Vec<&Record>> = HashMap::new();
    for item in &items {
        if let Some(key) = join_key(item) {
            items_by_key.entry(key).or_default().push(item);
        }
    }

    let mut merged = RecordSet::new();
    for order in &orders {
        let Some(key) = join_key(order) else {
            continue;
        };
        let Some(matching) = items_by_key.get(&key) else {
            continue;
        };
        for item in matching {
            let mut row = order.clone();
            row.insert(fields::ORDER_ID.to_string(), Value::String(key.clone()));
            for (column, value) in item.iter() {
                if column == fields::ORDER_ID {
                    continue;
                }
                if row.contains_key(column) {
                    row.insert(format!("{column}{ITEM_SUFFIX}"), value.clone());
                } else {
                    row.insert(column.clone(), value.clone());
                }
            }
            merged.push(row);
        }
    }
    merged
}
