//! Backing key-value store.

mod redis_cache;

pub use redis_cache::{RedisCacheService, RedisCacheServiceParameters};

use async_trait::async_trait;
use cacheable_config::RedisConfig;
use cacheable_core::{CacheableError, CacheableResult};
use deadpool_redis::{Config, Pool, Runtime};
use shaku::Interface;
use std::time::Duration;
use tracing::info;

#[cfg(test)]
use mockall::automock;

/// Raw string store the cache manager reads and writes.
///
/// Values are JSON text; keys are full store keys (`{cacheName}::{key}`).
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CacheInterface: Interface + Send + Sync {
    /// Get a raw value. `None` if absent or expired.
    async fn get_raw(&self, key: &str) -> CacheableResult<Option<String>>;

    /// Set a raw value with a TTL.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> CacheableResult<()>;

    /// Delete a value. Returns `true` if the key existed.
    async fn delete(&self, key: &str) -> CacheableResult<bool>;

    /// Check if a key exists.
    async fn exists(&self, key: &str) -> CacheableResult<bool>;

    /// Delete all keys matching a glob pattern. Returns the number deleted.
    async fn delete_pattern(&self, pattern: &str) -> CacheableResult<u64>;

    /// Whether the store is backed by a live connection.
    fn is_enabled(&self) -> bool;
}

/// Creates a Redis connection pool and checks it with `PING`.
pub async fn create_pool(config: &RedisConfig) -> CacheableResult<Pool> {
    info!("Creating Redis connection pool for cache store...");

    let pool = Config::from_url(&config.url)
        .builder()
        .map_err(|e| CacheableError::configuration(format!("Invalid Redis config: {}", e)))?
        .max_size(config.pool_size as usize)
        .runtime(Runtime::Tokio1)
        .build()
        .map_err(|e| CacheableError::configuration(format!("Failed to create Redis pool: {}", e)))?;

    let mut conn = pool
        .get()
        .await
        .map_err(|e| CacheableError::Cache(format!("Failed to get Redis connection: {}", e)))?;
    deadpool_redis::redis::cmd("PING")
        .query_async::<String>(&mut *conn)
        .await
        .map_err(|e| CacheableError::Cache(format!("Redis PING failed: {}", e)))?;

    info!("Redis connection pool created successfully");
    Ok(pool)
}
