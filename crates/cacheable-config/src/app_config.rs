//! Application configuration structures.

use cacheable_core::telemetry::TelemetryConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name and metadata.
    #[serde(default)]
    pub app: AppMetadata,

    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Redis configuration.
    #[serde(default)]
    pub redis: RedisConfig,

    /// Cache policies and key generation settings.
    #[serde(default)]
    pub cacheable: CacheableConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Application metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppMetadata {
    /// Application name. First segment of every generated cache key.
    pub name: String,
    /// Application version.
    pub version: String,
    /// Environment (development, staging, production).
    pub environment: String,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "cacheable-server".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Enable CORS.
    pub cors_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            cors_enabled: true,
        }
    }
}

impl ServerConfig {
    /// Returns the bind address.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the request timeout as a Duration.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Redis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Redis URL.
    pub url: String,
    /// Connection pool size.
    pub pool_size: u32,
    /// Enable Redis (can be disabled for local development).
    pub enabled: bool,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            pool_size: 10,
            enabled: true,
        }
    }
}

/// Which digest renders the argument part of a cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamDigestKind {
    /// Fast 32-bit polynomial hash. Distinct arguments may collide.
    #[default]
    Fast,
    /// SHA-256 over the structural JSON of the arguments.
    Sha256,
}

/// TTL entry for a single cache name, as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheNameTtl {
    /// Magnitude of the time-to-live.
    pub time_to_live: u64,
    /// Unit name: SECONDS, MINUTES, HOURS or DAYS.
    pub unit: String,
}

impl CacheNameTtl {
    /// Creates an entry.
    pub fn new(time_to_live: u64, unit: impl Into<String>) -> Self {
        Self {
            time_to_live,
            unit: unit.into(),
        }
    }
}

/// Cache policies.
///
/// ```toml
/// [cacheable.cache_names.sales-customers]
/// time_to_live = 60
/// unit = "SECONDS"
/// ```
///
/// Cache names must use `-` rather than `.` as a separator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheableConfig {
    /// Add a random offset to every TTL so entries of one cache name
    /// do not expire together.
    pub enable_ttl_auto_offset: bool,
    /// Exclusive upper bound of the random offset, in seconds.
    pub default_offset_seconds: u32,
    /// TTL for cache names absent from `cache_names`.
    pub default_ttl_secs: u64,
    /// Store `null` results instead of skipping them.
    pub cache_null_values: bool,
    /// Digest used for the argument segment of keys.
    pub param_digest: ParamDigestKind,
    /// Request header carrying the caller JSON (`{"userId": ..}`).
    pub identity_header: String,
    /// Per cache-name TTL.
    pub cache_names: BTreeMap<String, CacheNameTtl>,
}

impl Default for CacheableConfig {
    fn default() -> Self {
        Self {
            enable_ttl_auto_offset: true,
            default_offset_seconds: 30,
            default_ttl_secs: 300, // 5 minutes
            cache_null_values: false,
            param_digest: ParamDigestKind::Fast,
            identity_header: "userinfo".to_string(),
            cache_names: BTreeMap::new(),
        }
    }
}

impl CacheableConfig {
    /// Returns the fallback TTL as a Duration.
    #[must_use]
    pub const fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    /// Adds a cache-name policy.
    #[must_use]
    pub fn with_cache(mut self, name: impl Into<String>, ttl: CacheNameTtl) -> Self {
        self.cache_names.insert(name.into(), ttl);
        self
    }
}
