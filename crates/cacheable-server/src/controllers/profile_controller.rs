//! Per-user profile, cached per caller.

use crate::{
    responses::{ok, ApiResult},
    service::Profile,
    state::AppState,
};
use axum::{extract::State, routing::get, Router};

/// Creates the profile router.
pub fn router() -> Router<AppState> {
    Router::new().route("/profile", get(profile))
}

/// Profile of the caller named by the identity header.
async fn profile(State(state): State<AppState>) -> ApiResult<Profile> {
    let profile = state.sample_service.profile().await?;
    ok(profile)
}
