//! Shared application state.
//!
//! One state value is built per process and handed to every request through
//! an axum `Extension`; the cache inside it is the only shared mutable
//! resource in the service.

use std::sync::Arc;

use crate::cache::FreshnessCache;
use crate::config::AppConfig;
use crate::sheets::DataSource;

pub struct AppState {
    pub cache: FreshnessCache,
    pub source: Arc<dyn DataSource>,
}

impl AppState {
    pub fn new(config: &AppConfig, source: Arc<dyn DataSource>) -> Self {
        Self {
            cache: FreshnessCache::new(config.cache_ttl),
            source,
        }
    }
}
