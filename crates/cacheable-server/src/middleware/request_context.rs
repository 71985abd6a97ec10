//! Makes request headers visible to cache key generation.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use cacheable_cache::RequestContext;

/// Runs the rest of the request inside a [`RequestContext`] scope.
///
/// Key generators called by handlers read the caller identity from these
/// headers. Work spawned onto other tasks does not see the scope.
pub async fn request_context_middleware(request: Request<Body>, next: Next) -> Response {
    let context = RequestContext::new(request.headers().clone());
    context.scope(next.run(request)).await
}
