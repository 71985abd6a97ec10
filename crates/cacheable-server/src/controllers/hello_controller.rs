//! Shared greeting, cached for every caller.

use crate::{
    responses::{ok, ApiResult},
    service::HELLO_CACHE,
    state::AppState,
};
use axum::{
    extract::State,
    routing::{delete, get},
    Router,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

/// Greeting with the time the call took.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloResponse {
    pub message: String,
    pub elapsed_ms: u64,
}

/// Result of clearing a cache name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearCacheResponse {
    pub cache_name: String,
    pub removed: u64,
}

/// Creates the hello router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/hello", get(hello))
        .route("/hello/cache", delete(clear_hello_cache))
}

/// Returns the greeting. Slow on a miss, fast while cached.
async fn hello(State(state): State<AppState>) -> ApiResult<HelloResponse> {
    let start = Instant::now();
    let message = state.sample_service.hello().await?;
    let elapsed_ms = start.elapsed().as_millis() as u64;
    debug!(elapsed_ms, "Hello served");

    ok(HelloResponse {
        message,
        elapsed_ms,
    })
}

async fn clear_hello_cache(State(state): State<AppState>) -> ApiResult<ClearCacheResponse> {
    let removed = state.sample_service.clear_hello().await?;
    ok(ClearCacheResponse {
        cache_name: HELLO_CACHE.to_string(),
        removed,
    })
}
