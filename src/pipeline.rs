//! Fetch-normalize-merge pipeline and the route-side helper composing it
//! with the cache and filters.

use std::sync::Arc;

use tracing::info;

use crate::filter;
use crate::models::{FilterSpec, RecordSet};
use crate::sheets::{DataSource, DataSourceError};
use crate::state::AppState;
use crate::{dates, merge};

/// Fetch both sheets, normalize their date columns, and join them.
///
/// This is the expensive call the cache wraps; it performs two upstream
/// requests per invocation.
pub async fn load_merged(source: &dyn DataSource) -> Result<RecordSet, DataSourceError> {
    let mut orders = source.fetch_orders().await?;
    let mut items = source.fetch_line_items().await?;

    for record in orders.iter_mut().chain(items.iter_mut()) {
        dates::normalize_record_dates(record);
    }

    let merged = merge::merge(orders, items);
    info!(rows = merged.len(), "orders and line items merged");
    Ok(merged)
}

/// Cached merged records narrowed by the request's filters.
pub async fn load_filtered(
    state: &AppState,
    spec: &FilterSpec,
) -> Result<RecordSet, DataSourceError> {
    let source = Arc::clone(&state.source);
    let records = state
        .cache
        .get_or_refresh(|| async move { load_merged(source.as_ref()).await })
        .await?;
    if spec.is_empty() {
        return Ok(records.as_ref().clone());
    }
    Ok(filter::apply(&records, spec))
}
