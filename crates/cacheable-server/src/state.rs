//! Application state for Axum handlers.

use crate::service::SampleService;
use cacheable_cache::CacheInterface;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub sample_service: Arc<dyn SampleService>,
    pub cache_store: Arc<dyn CacheInterface>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        sample_service: Arc<dyn SampleService>,
        cache_store: Arc<dyn CacheInterface>,
    ) -> Self {
        Self {
            sample_service,
            cache_store,
        }
    }
}
