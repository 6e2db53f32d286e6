//! Application state and shared resources.

use anyhow::Result;
use std::sync::Arc;

use crate::cache::PictureCache;
use crate::config::ApiConfig;
use crate::metrics::MetricsCollector;
use crate::nasa::{NasaClient, PhotoSource};

/// Shared application state.
pub struct AppState {
    pub config: ApiConfig,
    pub cache: PictureCache,
    pub source: Arc<dyn PhotoSource>,
    pub metrics: Arc<MetricsCollector>,
}

impl AppState {
    /// Build state with the production upstream client.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let source = Arc::new(NasaClient::new(&config)?);
        Ok(Self::with_source(config, source))
    }

    /// Build state around an arbitrary photo source. Tests use this to
    /// substitute stub sources.
    pub fn with_source(config: ApiConfig, source: Arc<dyn PhotoSource>) -> Self {
        Self {
            config,
            cache: PictureCache::new(),
            source,
            metrics: Arc::new(MetricsCollector::new()),
        }
    }
}
