//! Health check controller.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Key probed by the readiness check.
const READINESS_PROBE_KEY: &str = "cacheable:readiness";

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status.
    pub status: String,
    /// Application version.
    pub version: String,
    /// Whether results are cached in Redis.
    pub cache_enabled: bool,
}

/// Creates the health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/live", get(liveness_check))
}

/// Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cache_enabled: state.cache_store.is_enabled(),
    })
}

/// Ready once the cache store answers. A disabled store is always ready.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.cache_store.exists(READINESS_PROBE_KEY).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            warn!(error = %e, "Cache store not ready");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Liveness check endpoint.
pub async fn liveness_check() -> impl IntoResponse {
    StatusCode::OK
}
