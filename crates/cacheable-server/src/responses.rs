//! API response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cacheable_cache::RequestContext;
use cacheable_core::{CacheableError, ErrorResponse};
use serde::{Deserialize, Serialize};

/// Standard API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
}

impl<T> ApiResponse<T> {
    /// Creates a successful response.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    /// Creates an error response.
    pub fn error(error: ErrorResponse) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

/// Handler error carrying a [`CacheableError`].
#[derive(Debug)]
pub struct AppError(pub CacheableError);

impl From<CacheableError> for AppError {
    fn from(err: CacheableError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut error = ErrorResponse::from_error(&self.0);
        if let Some(request_id) = current_request_id() {
            error = error.with_trace_id(request_id);
        }

        (status, Json(ApiResponse::error(error))).into_response()
    }
}

const REQUEST_ID_HEADER: &str = "x-request-id";

/// `x-request-id` of the request being served.
fn current_request_id() -> Option<String> {
    RequestContext::try_with_current(|r| r.header(REQUEST_ID_HEADER).map(str::to_owned))
        .flatten()
}

/// Result type for Axum handlers.
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

/// Wraps `data` in a success response.
pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}
