//! # Sales Dashboard API
//!
//! Reporting backend for a spreadsheet-backed sales dashboard.
//!
//! ## Pipeline
//!
//! 1. **FreshnessCache** serves merged records, refetching at most every TTL
//! 2. **SheetsClient** reads the orders and line-item tabs on a cache miss
//! 3. **DateNormalizer** + **RecordMerger** canonicalize and join the rows
//! 4. **FilterEngine** narrows the set per request parameters
//! 5. **AggregationEngine** or a plain projection produces the JSON payload
//!
//! ## Architecture
//!
//! - Axum handles HTTP routing and request/response lifecycle
//! - One process-wide `AppState` carries the cache and the Sheets client
//! - All degradation (stale cache, unparseable cells, missing join key) is
//!   resolved inside the pipeline; handlers only see hard upstream failures

mod aggregate;
mod cache;
mod config;
mod dates;
mod error;
mod filter;
mod merge;
mod models;
mod pipeline;
mod routes;
mod sheets;
mod state;

use std::sync::Arc;

use axum::{Extension, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;
use crate::sheets::SheetsClient;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sales_dashboard_api=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting sales dashboard API");

    let config = AppConfig::from_env();
    let source = Arc::new(SheetsClient::new(&config)?);
    info!(
        spreadsheet = %config.spreadsheet_id,
        ttl_secs = config.cache_ttl.as_secs(),
        "Sheets client configured"
    );

    let state = Arc::new(AppState::new(&config, source));

    // Build the axum router with all route modules
    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::data::router())
        .merge(routes::summary::router())
        .merge(routes::export::router())
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Bind and serve
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
