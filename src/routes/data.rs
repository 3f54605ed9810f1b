//! Filtered record listing route.
//!
//! GET /api/data - Merged order-line records narrowed by the filter params.

use std::sync::Arc;

use axum::extract::Query;
use axum::routing::get;
use axum::{Extension, Json, Router};
use tracing::info;

use crate::error::ApiError;
use crate::models::{DataResponse, FilterSpec};
use crate::pipeline;
use crate::state::AppState;

/// Build the data router.
pub fn router() -> Router {
    Router::new().route("/api/data", get(get_data))
}

async fn get_data(
    Extension(state): Extension<Arc<AppState>>,
    Query(spec): Query<FilterSpec>,
) -> Result<Json<DataResponse>, ApiError> {
    let records = pipeline::load_filtered(&state, &spec).await?;
    info!(count = records.len(), "data listing served");
    Ok(Json(DataResponse {
        success: true,
        count: records.len(),
        records,
    }))
}
