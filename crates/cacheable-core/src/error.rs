//! Unified error type for the caching layers.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for Cacheable.
///
/// Missing or malformed caller identity is never an error: it degrades to
/// the public bucket. Errors here are configuration problems found at
/// startup and failures of the backing store or of value serialization.
#[derive(Error, Debug)]
pub enum CacheableError {
    // ============ Configuration Errors ============
    /// Configuration error (fatal at startup)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A cache name refers to a time unit outside the supported set
    #[error("Cache '{cache_name}' has an unsupported time unit '{unit}' (expected one of SECONDS, MINUTES, HOURS, DAYS)")]
    UnknownTimeUnit { cache_name: String, unit: String },

    // ============ Infrastructure Errors ============
    /// Redis/Cache error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Cached value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The wrapped value loader failed
    #[error("Loader error: {0}")]
    Loader(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheableError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Cache(_) => 503,
            Self::Loader(_) => 502,
            Self::Configuration(_)
            | Self::UnknownTimeUnit { .. }
            | Self::Serialization(_)
            | Self::Internal(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::UnknownTimeUnit { .. } => "UNKNOWN_TIME_UNIT",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Loader(_) => "LOADER_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration<T: Into<String>>(message: T) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a cache error.
    #[must_use]
    pub fn cache<T: Into<String>>(message: T) -> Self {
        Self::Cache(message.into())
    }

    /// Creates a loader error.
    #[must_use]
    pub fn loader<T: Into<String>>(message: T) -> Self {
        Self::Loader(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }
}

impl From<serde_json::Error> for CacheableError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Request trace ID for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl ErrorResponse {
    /// Creates a new error response from a `CacheableError`.
    #[must_use]
    pub fn from_error(error: &CacheableError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
            trace_id: None,
        }
    }

    /// Sets the trace ID.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }
}

impl From<&CacheableError> for ErrorResponse {
    fn from(error: &CacheableError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(CacheableError::cache("down").status_code(), 503);
        assert_eq!(CacheableError::loader("db").status_code(), 502);
        assert_eq!(CacheableError::configuration("bad").status_code(), 500);
        assert_eq!(CacheableError::internal("oops").status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CacheableError::cache("down").error_code(), "CACHE_ERROR");
        assert_eq!(
            CacheableError::UnknownTimeUnit {
                cache_name: "sales-customers".to_string(),
                unit: "FORTNIGHTS".to_string(),
            }
            .error_code(),
            "UNKNOWN_TIME_UNIT"
        );
        assert_eq!(CacheableError::internal("x").error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_unknown_unit_message_names_cache_and_unit() {
        let err = CacheableError::UnknownTimeUnit {
            cache_name: "sales-customers".to_string(),
            unit: "FORTNIGHTS".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("sales-customers"));
        assert!(message.contains("FORTNIGHTS"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: CacheableError = json_err.into();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_error_response_with_trace_id() {
        let err = CacheableError::cache("down");
        let response = ErrorResponse::from_error(&err).with_trace_id("trace-123");
        assert_eq!(response.code, "CACHE_ERROR");
        assert_eq!(response.trace_id, Some("trace-123".to_string()));
    }

    #[test]
    fn test_error_response_from_ref() {
        let err = CacheableError::loader("upstream");
        let response: ErrorResponse = ErrorResponse::from(&err);
        assert_eq!(response.code, "LOADER_ERROR");
        assert!(response.message.contains("upstream"));
    }
}
