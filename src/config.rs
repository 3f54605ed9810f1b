//! Environment-driven configuration.
//!
//! Everything has a workable default for local development; deployments
//! override through the environment (loaded from `.env` by `main`).

use std::time::Duration;

/// Runtime configuration for the dashboard API.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub spreadsheet_id: String,
    pub orders_sheet: String,
    pub items_sheet: String,
    /// OAuth access token for the Sheets API, if the sheet is private.
    pub sheets_bearer_token: Option<String>,
    /// API key, sufficient for sheets shared as public-readable.
    pub sheets_api_key: Option<String>,
    pub cache_ttl: Duration,
    pub fetch_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:3000"),
            spreadsheet_id: env_or("SPREADSHEET_ID", ""),
            orders_sheet: env_or("ORDERS_SHEET_NAME", "Customer Orders"),
            // The production tab name ends with a space.
            items_sheet: env_or("ITEMS_SHEET_NAME", "Bakery Products Ordered "),
            sheets_bearer_token: std::env::var("SHEETS_BEARER_TOKEN").ok(),
            sheets_api_key: std::env::var("SHEETS_API_KEY").ok(),
            cache_ttl: Duration::from_secs(env_parsed("CACHE_TTL_SECONDS", 300)),
            fetch_timeout: Duration::from_secs(env_parsed("FETCH_TIMEOUT_SECONDS", 30)),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
