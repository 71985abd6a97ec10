//! Main application router.

use crate::{
    controllers::{health_controller, hello_controller, profile_controller},
    middleware::{logging_middleware, request_context_middleware},
    state::AppState,
};
use axum::{middleware, routing::get, Router};
use cacheable_config::ServerConfig;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the application router.
pub fn create_router(state: AppState, server_config: &ServerConfig) -> Router {
    let cors = create_cors_layer(server_config);

    let router = Router::new()
        .merge(health_controller::router())
        .merge(hello_controller::router())
        .merge(profile_controller::router())
        .route("/", get(root))
        .layer(middleware::from_fn(request_context_middleware))
        .layer(TimeoutLayer::new(server_config.request_timeout()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state);

    info!("Router created with /hello, /profile and health endpoints");
    router
}

fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if server_config.cors_enabled {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    }
}

async fn root() -> &'static str {
    "Cacheable sample server"
}
