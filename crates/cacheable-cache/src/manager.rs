//! Look-aside caching over a [`CacheInterface`].

use crate::key::{store_key, CacheTarget, KeyGenerator, KeyParams, CACHE_NAME_SEPARATOR};
use crate::store::CacheInterface;
use crate::ttl::TtlResolver;
use cacheable_config::CacheableConfig;
use cacheable_core::CacheableResult;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Behaviour switches of a [`CacheManager`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheManagerOptions {
    /// Store results that serialize to `null`.
    pub cache_null_values: bool,
}

impl From<&CacheableConfig> for CacheManagerOptions {
    fn from(config: &CacheableConfig) -> Self {
        Self {
            cache_null_values: config.cache_null_values,
        }
    }
}

/// Reads cached results, runs loaders on a miss and writes the result back.
///
/// The store is best effort: a failing read is treated as a miss and a
/// failing write only loses the entry. Loader errors are returned as is and
/// never cached.
#[derive(Clone)]
pub struct CacheManager {
    store: Arc<dyn CacheInterface>,
    ttl: TtlResolver,
    options: CacheManagerOptions,
}

impl CacheManager {
    /// Creates a manager.
    #[must_use]
    pub fn new(
        store: Arc<dyn CacheInterface>,
        ttl: TtlResolver,
        options: CacheManagerOptions,
    ) -> Self {
        Self { store, ttl, options }
    }

    /// Creates a manager with TTLs and options taken from configuration.
    pub fn from_config(
        store: Arc<dyn CacheInterface>,
        config: &CacheableConfig,
    ) -> CacheableResult<Self> {
        let ttl = TtlResolver::from_config(config)?;
        info!(
            cache_names = ttl.configure_all().len(),
            default_ttl_secs = ttl.default_ttl().as_secs(),
            store_enabled = store.is_enabled(),
            "Cache manager configured"
        );
        Ok(Self::new(store, ttl, CacheManagerOptions::from(config)))
    }

    /// TTL resolver in use.
    #[must_use]
    pub fn ttl(&self) -> &TtlResolver {
        &self.ttl
    }

    /// Returns the value cached under `{cache_name}::{key}`, or runs `loader`
    /// and caches what it returns.
    pub async fn get_or_load<T, F, Fut>(
        &self,
        cache_name: &str,
        key: &str,
        loader: F,
    ) -> CacheableResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = CacheableResult<T>>,
    {
        let full_key = store_key(cache_name, key);

        match self.store.get_raw(&full_key).await {
            Ok(Some(json)) => match serde_json::from_str::<T>(&json) {
                Ok(value) => {
                    debug!(key = %full_key, "Cache hit");
                    return Ok(value);
                }
                Err(e) => warn!(key = %full_key, error = %e, "Discarding unreadable cache entry"),
            },
            Ok(None) => debug!(key = %full_key, "Cache miss"),
            Err(e) => warn!(key = %full_key, error = %e, "Cache read failed, loading"),
        }

        let value = loader().await?;
        self.write_back(cache_name, &full_key, &value).await;
        Ok(value)
    }

    /// Generates the key for `target` called with `params`, then behaves like
    /// [`CacheManager::get_or_load`].
    ///
    /// The key is derived before the first await, in the caller's request or
    /// local identity context.
    pub async fn cacheable<T, F, Fut>(
        &self,
        cache_name: &str,
        generator: &dyn KeyGenerator,
        target: &CacheTarget,
        params: &KeyParams,
        loader: F,
    ) -> CacheableResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = CacheableResult<T>>,
    {
        let key = generator.generate(target, params);
        self.get_or_load(cache_name, &key, loader).await
    }

    /// Removes one entry. Returns true if it existed.
    pub async fn evict(&self, cache_name: &str, key: &str) -> CacheableResult<bool> {
        let full_key = store_key(cache_name, key);
        let removed = self.store.delete(&full_key).await?;
        debug!(key = %full_key, removed, "Cache entry evicted");
        Ok(removed)
    }

    /// Removes every entry of a cache name. Returns the number removed.
    pub async fn clear(&self, cache_name: &str) -> CacheableResult<u64> {
        let pattern = format!("{}{CACHE_NAME_SEPARATOR}*", escape_glob(cache_name));
        let removed = self.store.delete_pattern(&pattern).await?;
        info!(cache_name, removed, "Cache cleared");
        Ok(removed)
    }

    async fn write_back<T: Serialize>(&self, cache_name: &str, full_key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(key = %full_key, error = %e, "Result is not serializable, not cached");
                return;
            }
        };

        if json == "null" && !self.options.cache_null_values {
            debug!(key = %full_key, "Null result not cached");
            return;
        }

        let ttl = self.ttl.entry_ttl(cache_name);
        if let Err(e) = self.store.set_raw(full_key, &json, ttl).await {
            warn!(key = %full_key, error = %e, "Cache write failed");
        }
    }
}

/// Escapes characters Redis `MATCH` treats as pattern syntax.
fn escape_glob(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len());
    for c in literal.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
