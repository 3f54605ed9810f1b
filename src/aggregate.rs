//! Grouped aggregation over a filtered record set.
//!
//! Rows are denormalized order-lines, so order-level figures (`order_total`,
//! the per-type totals, distinct order counts) must count each order once.
//! The per-order `Total` is taken from the first row seen for that order in
//! encounter order; the upstream sheet repeats it on every line item. Numeric
//! coercion is forgiving: anything that is not a number, after stripping `$`
//! and thousands separators, counts as zero.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::dates::{value_as_text, DAY_FORMAT};
use crate::models::{fields, Record};

/// How many products the product-revenue ranking keeps.
const TOP_PRODUCTS: usize = 10;

/// Aggregates computed for the summary endpoint.
#[derive(Debug, Default, Serialize)]
pub struct Summary {
    pub total_orders: usize,
    pub total_items: usize,
    pub total_revenue: f64,
    pub order_total: f64,
    pub revenue_by_category: Vec<GroupTotal>,
    pub top_products: Vec<GroupTotal>,
    pub total_by_order_type: Vec<GroupTotal>,
    pub daily_trend: Vec<TrendPoint>,
}

/// One (group, amount) pair in a grouped sum.
#[derive(Debug, PartialEq, Serialize)]
pub struct GroupTotal {
    pub name: String,
    pub amount: f64,
}

/// One calendar day in the daily trend.
#[derive(Debug, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: String,
    pub revenue: f64,
    pub orders: usize,
}

/// Coerce a cell to a number; missing or non-numeric values count as zero.
pub fn coerce_number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => {
            let cleaned = s.trim().trim_start_matches('$').replace(',', "");
            cleaned.parse::<f64>().unwrap_or(0.0)
        }
        _ => 0.0,
    }
}

/// Compute the full summary over an already-filtered record set.
///
/// An empty input yields zeroed totals and empty groupings, never an error.
pub fn summarize(records: &[Record]) -> Summary {
    let mut distinct_orders: HashSet<String> = HashSet::new();
    let mut total_revenue = 0.0;
    let mut order_total = 0.0;
    let mut by_category = GroupedSum::new();
    let mut by_product = GroupedSum::new();
    let mut by_order_type = GroupedSum::new();
    let mut by_day: BTreeMap<NaiveDate, (f64, HashSet<String>)> = BTreeMap::new();

    for record in records {
        let order_id = record
            .get(fields::ORDER_ID)
            .map(value_as_text)
            .unwrap_or_default();
        let subtotal = coerce_number(record.get(fields::SUBTOTAL));
        total_revenue += subtotal;

        // Order-level figures: first row per order wins.
        if distinct_orders.insert(order_id.clone()) {
            let total = coerce_number(record.get(fields::TOTAL));
            order_total += total;
            let order_type = record
                .get(fields::ORDER_TYPE)
                .map(value_as_text)
                .unwrap_or_default();
            by_order_type.add(order_type, total);
        }

        let category = record
            .get(fields::CATEGORY)
            .map(value_as_text)
            .unwrap_or_default();
        by_category.add(category, subtotal);

        let product = record
            .get(fields::PRODUCT_DESCRIPTION)
            .map(value_as_text)
            .unwrap_or_default();
        by_product.add(product, subtotal);

        if let Some(day) = record
            .get(fields::ORDER_DATE)
            .map(value_as_text)
            .and_then(|s| NaiveDate::parse_from_str(&s, DAY_FORMAT).ok())
        {
            let entry = by_day.entry(day).or_default();
            entry.0 += subtotal;
            entry.1.insert(order_id);
        }
    }

    Summary {
        total_orders: distinct_orders.len(),
        total_items: records.len(),
        total_revenue,
        order_total,
        revenue_by_category: by_category.ranked(usize::MAX),
        top_products: by_product.ranked(TOP_PRODUCTS),
        total_by_order_type: by_order_type.ranked(usize::MAX),
        daily_trend: by_day
            .into_iter()
            .map(|(day, (revenue, orders))| TrendPoint {
                date: day.format(DAY_FORMAT).to_string(),
                revenue,
                orders: orders.len(),
            })
            .collect(),
    }
}

/// Grouped sum that remembers encounter order for stable tie-breaking.
struct GroupedSum {
    order: Vec<String>,
    sums: HashMap<String, f64>,
}

impl GroupedSum {
    fn new() -> Self {
        Self {
            order: Vec::new(),
            sums: HashMap::new(),
        }
    }

    fn add(&mut self, group: String, amount: f64) {
        if !self.sums.contains_key(&group) {
            self.order.push(group.clone());
        }
        *self.sums.entry(group).or_insert(0.0) += amount;
    }

    /// Groups sorted by amount descending; ties keep encounter order
    /// (stable sort over the encounter-ordered list). Truncated to `limit`.
    fn ranked(self, limit: usize) -> Vec<GroupTotal> {
        let mut ranked: Vec<GroupTotal> = self
            .order
            .into_iter()
            .map(|name| {
                let amount = self.sums[&name];
                GroupTotal { name, amount }
            })
            .collect();
        ranked.sort_by(|a, b| b.amount.partial_cmp(&a.amount).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(limit);
        ranked
    }
}
