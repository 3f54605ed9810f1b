//! Health check route.
//!
//! GET /api/health - Liveness probe, no upstream calls.

use axum::routing::get;
use axum::{Json, Router};

/// Build the health router.
pub fn router() -> Router {
    Router::new().route("/api/health", get(health))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "message": "API is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
