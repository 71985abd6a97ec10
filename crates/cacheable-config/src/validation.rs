//! Configuration validation module.
//!
//! Every cache policy is checked at load time so an unknown unit or a bad
//! cache name stops the process before any cache is touched.

use crate::{AppConfig, TimeUnit};
use std::fmt;
use url::Url;

/// Characters with special meaning in a Redis `SCAN MATCH` pattern.
const GLOB_METACHARACTERS: [char; 5] = ['*', '?', '[', ']', '\\'];

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    /// Application name is empty (it prefixes every cache key).
    MissingAppName,
    /// Cache name is empty, contains a `.`, or contains a Redis glob
    /// metacharacter (`*`, `?`, `[`, `]`, `\`).
    InvalidCacheName { cache_name: String },
    /// Cache TTL unit is not one of SECONDS, MINUTES, HOURS, DAYS.
    UnknownTimeUnit { cache_name: String, unit: String },
    /// Offset ceiling must be positive while TTL offset is enabled.
    InvalidOffsetCeiling { value: u32 },
    /// Timeout or TTL value must be positive.
    NonPositiveTimeout { name: String, value: u64 },
    /// Identity header name is empty.
    MissingIdentityHeader,
    /// Port number is invalid.
    InvalidPort { name: String, value: u16 },
    /// Pool size is zero.
    InvalidPoolSize { value: u32 },
    /// Pool size exceeds maximum allowed.
    PoolSizeTooLarge { value: u32, maximum: u32 },
    /// URL format is invalid.
    InvalidUrl { url_type: String, message: String },
    /// Sampling ratio must be between 0.0 and 1.0.
    InvalidSamplingRatio { value: f64 },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAppName => write!(f, "Application name (app.name) is required"),
            Self::InvalidCacheName { cache_name } => {
                write!(
                    f,
                    "Invalid cache name '{}': must be non-empty, use '-' instead of '.' \
                     and contain none of * ? [ ] \\",
                    cache_name
                )
            }
            Self::UnknownTimeUnit { cache_name, unit } => {
                write!(
                    f,
                    "Cache '{}' has an unsupported unit '{}' (valid: SECONDS, MINUTES, HOURS, DAYS)",
                    cache_name, unit
                )
            }
            Self::InvalidOffsetCeiling { value } => {
                write!(
                    f,
                    "Invalid default_offset_seconds: {} (must be positive when TTL auto offset is enabled)",
                    value
                )
            }
            Self::NonPositiveTimeout { name, value } => {
                write!(f, "Timeout '{}' must be positive, got {}", name, value)
            }
            Self::MissingIdentityHeader => {
                write!(f, "Identity header name (cacheable.identity_header) is required")
            }
            Self::InvalidPort { name, value } => {
                write!(f, "Invalid port for {}: {} (must be 1-65535)", name, value)
            }
            Self::InvalidPoolSize { value } => {
                write!(f, "Invalid pool size: {} (must be positive)", value)
            }
            Self::PoolSizeTooLarge { value, maximum } => {
                write!(f, "Pool size {} exceeds maximum allowed ({})", value, maximum)
            }
            Self::InvalidUrl { url_type, message } => {
                write!(f, "Invalid {} URL: {}", url_type, message)
            }
            Self::InvalidSamplingRatio { value } => {
                write!(
                    f,
                    "Invalid sampling ratio: {} (must be between 0.0 and 1.0)",
                    value
                )
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Result of configuration validation containing all errors found.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<ConfigValidationError>,
}

impl ValidationResult {
    fn add_error(&mut self, error: ConfigValidationError) {
        self.errors.push(error);
    }

    fn into_result(self) -> Result<(), Vec<ConfigValidationError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Maximum connection pool size.
    const MAX_POOL_SIZE: u32 = 1000;

    /// Validates the entire application configuration.
    ///
    /// Returns Ok(()) if valid, or Err with all validation errors found.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut result = ValidationResult::default();

        if config.app.name.trim().is_empty() {
            result.add_error(ConfigValidationError::MissingAppName);
        }

        Self::validate_cacheable(&config.cacheable, &mut result);
        Self::validate_server(&config.server, &mut result);
        Self::validate_redis(&config.redis, &mut result);
        Self::validate_telemetry(&config.telemetry, &mut result);

        result.into_result()
    }

    /// Validates cache policies only.
    pub fn validate_cache_policies(
        config: &crate::CacheableConfig,
    ) -> Result<(), Vec<ConfigValidationError>> {
        let mut result = ValidationResult::default();
        Self::validate_cacheable(config, &mut result);
        result.into_result()
    }

    fn validate_cacheable(config: &crate::CacheableConfig, result: &mut ValidationResult) {
        for (cache_name, ttl) in &config.cache_names {
            if cache_name.is_empty()
                || cache_name.contains('.')
                || cache_name.contains(GLOB_METACHARACTERS)
            {
                result.add_error(ConfigValidationError::InvalidCacheName {
                    cache_name: cache_name.clone(),
                });
            }

            if TimeUnit::parse(&ttl.unit).is_none() {
                result.add_error(ConfigValidationError::UnknownTimeUnit {
                    cache_name: cache_name.clone(),
                    unit: ttl.unit.clone(),
                });
            }

            if ttl.time_to_live == 0 {
                result.add_error(ConfigValidationError::NonPositiveTimeout {
                    name: format!("cacheable.cache_names.{}.time_to_live", cache_name),
                    value: 0,
                });
            }
        }

        if config.enable_ttl_auto_offset && config.default_offset_seconds == 0 {
            result.add_error(ConfigValidationError::InvalidOffsetCeiling {
                value: config.default_offset_seconds,
            });
        }

        if config.default_ttl_secs == 0 {
            result.add_error(ConfigValidationError::NonPositiveTimeout {
                name: "cacheable.default_ttl_secs".to_string(),
                value: 0,
            });
        }

        if config.identity_header.trim().is_empty() {
            result.add_error(ConfigValidationError::MissingIdentityHeader);
        }
    }

    fn validate_server(config: &crate::ServerConfig, result: &mut ValidationResult) {
        if config.port == 0 {
            result.add_error(ConfigValidationError::InvalidPort {
                name: "server.port".to_string(),
                value: config.port,
            });
        }

        if config.request_timeout_secs == 0 {
            result.add_error(ConfigValidationError::NonPositiveTimeout {
                name: "server.request_timeout_secs".to_string(),
                value: 0,
            });
        }
    }

    fn validate_redis(config: &crate::RedisConfig, result: &mut ValidationResult) {
        if !config.enabled {
            return;
        }

        if !config.url.starts_with("redis://") && !config.url.starts_with("rediss://") {
            result.add_error(ConfigValidationError::InvalidUrl {
                url_type: "redis".to_string(),
                message: "URL must start with redis:// or rediss://".to_string(),
            });
        } else if Url::parse(&config.url).is_err() {
            result.add_error(ConfigValidationError::InvalidUrl {
                url_type: "redis".to_string(),
                message: format!("Invalid URL format: {}", config.url),
            });
        }

        if config.pool_size == 0 {
            result.add_error(ConfigValidationError::InvalidPoolSize { value: 0 });
        } else if config.pool_size > Self::MAX_POOL_SIZE {
            result.add_error(ConfigValidationError::PoolSizeTooLarge {
                value: config.pool_size,
                maximum: Self::MAX_POOL_SIZE,
            });
        }
    }

    fn validate_telemetry(
        config: &cacheable_core::telemetry::TelemetryConfig,
        result: &mut ValidationResult,
    ) {
        if !(0.0..=1.0).contains(&config.sampling_ratio) {
            result.add_error(ConfigValidationError::InvalidSamplingRatio {
                value: config.sampling_ratio,
            });
        }

        if let Some(ref endpoint) = config.otlp_endpoint {
            if Url::parse(endpoint).is_err() {
                result.add_error(ConfigValidationError::InvalidUrl {
                    url_type: "otlp_endpoint".to_string(),
                    message: format!("Invalid URL format: {}", endpoint),
                });
            }
        }
    }
}

/// Formats validation errors for display.
pub fn format_validation_errors(errors: &[ConfigValidationError]) -> String {
    let mut output = String::from("Configuration validation failed:\n");
    for (i, error) in errors.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, error));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CacheNameTtl;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.cacheable = config
            .cacheable
            .with_cache("sales-customers", CacheNameTtl::new(60, "SECONDS"))
            .with_cache("hello-world", CacheNameTtl::new(2, "minutes"));
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(ConfigValidator::validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_unknown_unit_names_cache_and_unit() {
        let mut config = valid_config();
        config
            .cacheable
            .cache_names
            .insert("orders".to_string(), CacheNameTtl::new(1, "FORTNIGHTS"));

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ConfigValidationError::UnknownTimeUnit {
                cache_name: "orders".to_string(),
                unit: "FORTNIGHTS".to_string(),
            }]
        );
        let message = errors[0].to_string();
        assert!(message.contains("orders"));
        assert!(message.contains("FORTNIGHTS"));
    }

    #[test]
    fn test_dotted_cache_name_rejected() {
        let mut config = valid_config();
        config
            .cacheable
            .cache_names
            .insert("sales.customer".to_string(), CacheNameTtl::new(1, "SECONDS"));

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigValidationError::InvalidCacheName { cache_name } if cache_name == "sales.customer"
        )));
    }

    #[test]
    fn test_glob_metacharacters_in_cache_name_rejected() {
        for name in ["sales*", "sales?", "sales[0]", r"sales\x"] {
            let mut config = valid_config();
            config
                .cacheable
                .cache_names
                .insert(name.to_string(), CacheNameTtl::new(1, "SECONDS"));

            let errors = ConfigValidator::validate(&config).unwrap_err();
            assert_eq!(
                errors,
                vec![ConfigValidationError::InvalidCacheName {
                    cache_name: name.to_string(),
                }],
                "{name}"
            );
        }
    }

    #[test]
    fn test_zero_pool_size_rejected() {
        let mut config = valid_config();
        config.redis.pool_size = 0;

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(errors, vec![ConfigValidationError::InvalidPoolSize { value: 0 }]);
        assert!(errors[0].to_string().contains("must be positive"));
    }

    #[test]
    fn test_zero_offset_ceiling_only_matters_when_enabled() {
        let mut config = valid_config();
        config.cacheable.default_offset_seconds = 0;
        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigValidationError::InvalidOffsetCeiling { value: 0 })));

        config.cacheable.enable_ttl_auto_offset = false;
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_zero_time_to_live_rejected() {
        let mut config = valid_config();
        config
            .cacheable
            .cache_names
            .insert("flash".to_string(), CacheNameTtl::new(0, "SECONDS"));

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigValidationError::NonPositiveTimeout { name, .. } if name.contains("flash")
        )));
    }

    #[test]
    fn test_invalid_redis_url() {
        let mut config = valid_config();
        config.redis.url = "http://localhost:6379".to_string();

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigValidationError::InvalidUrl { url_type, .. } if url_type == "redis"
        )));
    }

    #[test]
    fn test_disabled_redis_skips_url_check() {
        let mut config = valid_config();
        config.redis.enabled = false;
        config.redis.url = String::new();
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_multiple_errors() {
        let mut config = valid_config();
        config.app.name = " ".to_string();
        config.server.port = 0;
        config.cacheable.identity_header = String::new();
        config.telemetry.sampling_ratio = 1.5;

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_validate_cache_policies_only() {
        let mut config = valid_config();
        config.server.port = 0;
        assert!(ConfigValidator::validate_cache_policies(&config.cacheable).is_ok());
    }

    #[test]
    fn test_format_validation_errors() {
        let errors = vec![
            ConfigValidationError::MissingAppName,
            ConfigValidationError::UnknownTimeUnit {
                cache_name: "orders".to_string(),
                unit: "EONS".to_string(),
            },
        ];

        let output = format_validation_errors(&errors);
        assert!(output.starts_with("Configuration validation failed:"));
        assert!(output.contains("1. Application name"));
        assert!(output.contains("2. Cache 'orders'"));
    }
}
