//! Per cache-name time-to-live with random offset.

use cacheable_config::{format_validation_errors, CacheableConfig, ConfigValidator, TimeUnit};
use cacheable_core::{CacheableError, CacheableResult};
use rand::Rng;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::trace;

/// Validated TTL of one cache name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub time_to_live: u64,
    pub unit: TimeUnit,
}

impl CachePolicy {
    /// Base duration before any offset.
    #[must_use]
    pub const fn base(&self) -> Duration {
        self.unit.to_duration(self.time_to_live)
    }
}

/// Resolves entry expirations.
///
/// With the offset enabled each call draws a fresh offset in
/// `[0, ceiling)` seconds, so entries written at different times under one
/// cache name do not all expire together.
#[derive(Debug, Clone)]
pub struct TtlResolver {
    enable_offset: bool,
    offset_ceiling_secs: u32,
    default_ttl: Duration,
    policies: BTreeMap<String, CachePolicy>,
}

impl TtlResolver {
    /// Creates a resolver with no cache-name policies.
    #[must_use]
    pub fn new(enable_offset: bool, offset_ceiling_secs: u32, default_ttl: Duration) -> Self {
        Self {
            enable_offset,
            offset_ceiling_secs,
            default_ttl,
            policies: BTreeMap::new(),
        }
    }

    /// Builds a resolver from configuration, failing on the first invalid
    /// policy with the cache name and offending unit in the message.
    pub fn from_config(config: &CacheableConfig) -> CacheableResult<Self> {
        ConfigValidator::validate_cache_policies(config)
            .map_err(|errors| CacheableError::configuration(format_validation_errors(&errors)))?;

        let mut resolver = Self::new(
            config.enable_ttl_auto_offset,
            config.default_offset_seconds,
            config.default_ttl(),
        );
        for (cache_name, ttl) in &config.cache_names {
            let unit = TimeUnit::for_cache(cache_name, &ttl.unit)?;
            resolver = resolver.with_policy(
                cache_name.clone(),
                CachePolicy {
                    time_to_live: ttl.time_to_live,
                    unit,
                },
            );
        }
        Ok(resolver)
    }

    /// Adds or replaces a cache-name policy.
    #[must_use]
    pub fn with_policy(mut self, cache_name: impl Into<String>, policy: CachePolicy) -> Self {
        self.policies.insert(cache_name.into(), policy);
        self
    }

    /// Effective TTL for `time_to_live` `unit`s, plus a random offset when
    /// enabled.
    #[must_use]
    pub fn resolve(&self, cache_name: &str, time_to_live: u64, unit: TimeUnit) -> Duration {
        let base = unit.to_duration(time_to_live);
        if !self.enable_offset || self.offset_ceiling_secs == 0 {
            return base;
        }

        let offset = rand::thread_rng().gen_range(0..self.offset_ceiling_secs);
        trace!(cache_name, offset_secs = offset, "TTL offset applied");
        base.saturating_add(Duration::from_secs(u64::from(offset)))
    }

    /// Effective TTL of a configured cache name.
    #[must_use]
    pub fn resolve_cache(&self, cache_name: &str) -> Option<Duration> {
        self.policies
            .get(cache_name)
            .map(|policy| self.resolve(cache_name, policy.time_to_live, policy.unit))
    }

    /// TTL for a new entry: the cache-name policy, or the default TTL
    /// (without offset) for names that have none.
    #[must_use]
    pub fn entry_ttl(&self, cache_name: &str) -> Duration {
        self.resolve_cache(cache_name).unwrap_or(self.default_ttl)
    }

    /// One resolved TTL per configured cache name.
    #[must_use]
    pub fn configure_all(&self) -> BTreeMap<String, Duration> {
        self.policies
            .keys()
            .filter_map(|name| Some((name.clone(), self.resolve_cache(name)?)))
            .collect()
    }

    /// Policy of a configured cache name.
    #[must_use]
    pub fn policy(&self, cache_name: &str) -> Option<&CachePolicy> {
        self.policies.get(cache_name)
    }

    /// TTL used for unconfigured cache names.
    #[must_use]
    pub const fn default_ttl(&self) -> Duration {
        self.default_ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cacheable_config::CacheNameTtl;

    fn config(enable_offset: bool) -> CacheableConfig {
        CacheableConfig {
            enable_ttl_auto_offset: enable_offset,
            default_offset_seconds: 30,
            ..CacheableConfig::default()
        }
        .with_cache("sales-customers", CacheNameTtl::new(60, "SECONDS"))
        .with_cache("hello-world", CacheNameTtl::new(2, "MINUTES"))
        .with_cache("reports", CacheNameTtl::new(1, "days"))
    }

    #[test]
    fn test_without_offset_returns_base_seconds() {
        let resolver = TtlResolver::from_config(&config(false)).unwrap();
        assert_eq!(resolver.resolve_cache("sales-customers"), Some(Duration::from_secs(60)));
        assert_eq!(resolver.resolve_cache("hello-world"), Some(Duration::from_secs(120)));
        assert_eq!(resolver.resolve_cache("reports"), Some(Duration::from_secs(86_400)));
        assert_eq!(
            resolver.resolve("adhoc", 3, TimeUnit::Hours),
            Duration::from_secs(10_800)
        );
    }

    #[test]
    fn test_offset_stays_within_ceiling() {
        let resolver = TtlResolver::from_config(&config(true)).unwrap();
        let base = Duration::from_secs(120);
        let ceiling = Duration::from_secs(30);
        for _ in 0..500 {
            let ttl = resolver.resolve_cache("hello-world").unwrap();
            assert!(ttl >= base);
            assert!(ttl < base + ceiling);
            assert_eq!(ttl.subsec_nanos(), 0);
        }
    }

    #[test]
    fn test_offset_is_drawn_per_call() {
        let resolver = TtlResolver::new(true, 1_000_000, Duration::from_secs(300));
        let draws: std::collections::HashSet<Duration> = (0..20)
            .map(|_| resolver.resolve("orders", 1, TimeUnit::Seconds))
            .collect();
        assert!(draws.len() > 1);
    }

    #[test]
    fn test_unknown_unit_fails_fast() {
        let config = config(true).with_cache("orders", CacheNameTtl::new(1, "FORTNIGHTS"));
        let err = TtlResolver::from_config(&config).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("orders"));
        assert!(message.contains("FORTNIGHTS"));
    }

    #[test]
    fn test_entry_ttl_falls_back_to_default() {
        let resolver = TtlResolver::from_config(&config(true)).unwrap();
        assert_eq!(resolver.entry_ttl("unconfigured"), Duration::from_secs(300));
        assert_eq!(resolver.resolve_cache("unconfigured"), None);
        assert_eq!(resolver.default_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_configure_all_covers_every_name() {
        let resolver = TtlResolver::from_config(&config(false)).unwrap();
        let all = resolver.configure_all();
        assert_eq!(all.len(), 3);
        assert_eq!(all["sales-customers"], Duration::from_secs(60));
        assert_eq!(
            resolver.policy("reports"),
            Some(&CachePolicy {
                time_to_live: 1,
                unit: TimeUnit::Days
            })
        );
    }
}
