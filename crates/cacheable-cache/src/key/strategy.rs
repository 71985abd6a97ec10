//! How a caller id is extracted from an active request.

use crate::context::RequestContext;
use serde_json::Value;
use tracing::debug;

/// Default header carrying the gateway-authenticated caller.
pub const DEFAULT_IDENTITY_HEADER: &str = "userinfo";

/// Extracts the caller id from the active request.
pub trait IdentityStrategy: Send + Sync {
    /// Returns the caller id, or `None` for the public bucket.
    fn user_id(&self, request: &RequestContext) -> Option<i64>;
}

/// Reads the caller from a JSON header such as `userinfo: {"userId": 402}`.
///
/// Missing, empty or malformed headers yield no identity.
#[derive(Debug, Clone)]
pub struct AuthorizationIdentity {
    header: String,
}

impl AuthorizationIdentity {
    /// Reads identity from `header`.
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
        }
    }

    /// The header this strategy reads.
    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }
}

impl Default for AuthorizationIdentity {
    fn default() -> Self {
        Self::new(DEFAULT_IDENTITY_HEADER)
    }
}

impl IdentityStrategy for AuthorizationIdentity {
    fn user_id(&self, request: &RequestContext) -> Option<i64> {
        let raw = request.header(&self.header)?.trim();
        if raw.is_empty() {
            return None;
        }

        let info: Value = match serde_json::from_str(raw) {
            Ok(info) => info,
            Err(e) => {
                debug!(header = %self.header, error = %e, "Identity header is not valid JSON");
                return None;
            }
        };

        // Accept both 402 and "402".
        match info.get("userId")? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Shared data: every caller lands in the same bucket.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicDataIdentity;

impl IdentityStrategy for PublicDataIdentity {
    fn user_id(&self, _request: &RequestContext) -> Option<i64> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(userinfo: &str) -> RequestContext {
        RequestContext::default().with_header(DEFAULT_IDENTITY_HEADER, userinfo)
    }

    #[test]
    fn test_reads_numeric_user_id() {
        let strategy = AuthorizationIdentity::default();
        assert_eq!(strategy.user_id(&request(r#"{"userId":402,"name":"ann"}"#)), Some(402));
    }

    #[test]
    fn test_reads_string_user_id() {
        let strategy = AuthorizationIdentity::default();
        assert_eq!(strategy.user_id(&request(r#"{"userId":"17"}"#)), Some(17));
    }

    #[test]
    fn test_missing_or_malformed_header_is_anonymous() {
        let strategy = AuthorizationIdentity::default();
        assert_eq!(strategy.user_id(&RequestContext::default()), None);
        assert_eq!(strategy.user_id(&request("")), None);
        assert_eq!(strategy.user_id(&request("   ")), None);
        assert_eq!(strategy.user_id(&request("not-json")), None);
        assert_eq!(strategy.user_id(&request(r#"{"name":"ann"}"#)), None);
        assert_eq!(strategy.user_id(&request(r#"{"userId":true}"#)), None);
        assert_eq!(strategy.user_id(&request("[1,2]")), None);
    }

    #[test]
    fn test_reads_user_id_next_to_non_ascii_fields() {
        let mut headers = http::HeaderMap::new();
        headers.insert(
            DEFAULT_IDENTITY_HEADER,
            http::HeaderValue::from_bytes(r#"{"userId":402,"name":"张三"}"#.as_bytes()).unwrap(),
        );
        let strategy = AuthorizationIdentity::default();
        assert_eq!(strategy.user_id(&RequestContext::new(headers)), Some(402));
    }

    #[test]
    fn test_custom_header() {
        let strategy = AuthorizationIdentity::new("x-caller");
        let ctx = RequestContext::default().with_header("x-caller", r#"{"userId":3}"#);
        assert_eq!(strategy.header(), "x-caller");
        assert_eq!(strategy.user_id(&ctx), Some(3));
        assert_eq!(strategy.user_id(&request(r#"{"userId":4}"#)), None);
    }

    #[test]
    fn test_public_data_has_no_identity() {
        assert_eq!(PublicDataIdentity.user_id(&request(r#"{"userId":402}"#)), None);
    }
}
