//! Export table route.
//!
//! GET /api/export/orders - The filtered records projected onto the fixed
//! column set the PDF/Excel renderers lay out. An empty filtered set is a
//! distinct "no data to export" error, not an empty document.

use std::sync::Arc;

use axum::extract::Query;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::Value;
use tracing::info;

use crate::error::ApiError;
use crate::models::{fields, ExportResponse, FilterSpec, Record};
use crate::pipeline;
use crate::state::AppState;

/// Columns of the export table, in render order.
const EXPORT_COLUMNS: [&str; 9] = [
    fields::ORDER_ID,
    fields::ORDER_DATE,
    fields::DUE_PICKUP_DATE,
    fields::ORDER_TYPE,
    fields::CUSTOMER_FIRST_NAME,
    fields::CUSTOMER_LAST_NAME,
    fields::PRODUCT_DESCRIPTION,
    fields::SUBTOTAL,
    fields::TOTAL,
];

/// Build the export router.
pub fn router() -> Router {
    Router::new().route("/api/export/orders", get(export_orders))
}

async fn export_orders(
    Extension(state): Extension<Arc<AppState>>,
    Query(spec): Query<FilterSpec>,
) -> Result<Json<ExportResponse>, ApiError> {
    let records = pipeline::load_filtered(&state, &spec).await?;
    if records.is_empty() {
        return Err(ApiError::NoData);
    }

    let rows: Vec<Vec<Value>> = records.iter().map(project_row).collect();
    info!(rows = rows.len(), "export table served");
    Ok(Json(ExportResponse {
        success: true,
        columns: EXPORT_COLUMNS.iter().map(|c| c.trim().to_string()).collect(),
        rows,
    }))
}

/// Project a record onto the export columns; absent cells become null.
fn project_row(record: &Record) -> Vec<Value> {
    EXPORT_COLUMNS
        .iter()
        .map(|column| record.get(*column).cloned().unwrap_or(Value::Null))
        .collect()
}
