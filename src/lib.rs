//! # Sales Dashboard API Library
//!
//! Exposes the axum router and the data pipeline modules so integration
//! tests can drive an in-process app with a mock data source.

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod dates;
pub mod error;
pub mod filter;
pub mod merge;
pub mod models;
pub mod pipeline;
pub mod routes;
pub mod sheets;
pub mod state;

use std::sync::Arc;

use axum::{Extension, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the axum router with all route modules and middleware.
///
/// The caller is responsible for constructing the shared state (config,
/// cache, data source). This function does NOT start a server.
pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::data::router())
        .merge(routes::summary::router())
        .merge(routes::export::router())
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
