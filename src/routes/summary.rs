//! Summary aggregates route.
//!
//! GET /api/summary - Totals, grouped revenue, top products, and the daily
//! trend over the filtered record set.

use std::sync::Arc;

use axum::extract::Query;
use axum::routing::get;
use axum::{Extension, Json, Router};
use tracing::info;

use crate::aggregate;
use crate::error::ApiError;
use crate::models::{FilterSpec, SummaryResponse};
use crate::pipeline;
use crate::state::AppState;

/// Build the summary router.
pub fn router() -> Router {
    Router::new().route("/api/summary", get(get_summary))
}

async fn get_summary(
    Extension(state): Extension<Arc<AppState>>,
    Query(spec): Query<FilterSpec>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let records = pipeline::load_filtered(&state, &spec).await?;
    let summary = aggregate::summarize(&records);
    info!(
        orders = summary.total_orders,
        items = summary.total_items,
        "summary served"
    );
    Ok(Json(SummaryResponse {
        success: true,
        summary,
    }))
}
