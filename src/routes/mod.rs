//! HTTP route modules for the dashboard API.
//!
//! Each module is a thin request/response mapping over the pipeline:
//! - `health`: liveness probe
//! - `data`: filtered record listing
//! - `summary`: grouped aggregates for the dashboard charts
//! - `export`: aggregated order table for the document renderers

pub mod data;
pub mod export;
pub mod health;
pub mod summary;
