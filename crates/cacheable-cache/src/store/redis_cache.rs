//! Redis-based cache store.

use super::CacheInterface;
use async_trait::async_trait;
use cacheable_core::{CacheableError, CacheableResult};
use deadpool_redis::{redis::AsyncCommands, Pool};
use shaku::Component;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Keys fetched per `SCAN` round trip when clearing a cache name.
const SCAN_BATCH: usize = 500;

/// Redis-based cache store.
///
/// Without a pool every read misses and every write is dropped, which lets
/// a service run with caching switched off.
#[derive(Component)]
#[shaku(interface = CacheInterface)]
pub struct RedisCacheService {
    /// Redis connection pool.
    pool: Option<Arc<Pool>>,
}

impl RedisCacheService {
    /// Create a new Redis cache store.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool: Some(pool) }
    }

    /// Create a no-op store (for when Redis is disabled).
    #[must_use]
    pub fn disabled() -> Self {
        Self { pool: None }
    }

    async fn get_conn(&self) -> CacheableResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => pool.get().await.map_err(|e| {
                CacheableError::Cache(format!("Failed to get Redis connection: {}", e))
            }),
            None => Err(CacheableError::Cache("Cache is disabled".to_string())),
        }
    }
}

#[async_trait]
impl CacheInterface for RedisCacheService {
    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    async fn get_raw(&self, key: &str) -> CacheableResult<Option<String>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let mut conn = self.get_conn().await?;
        conn.get(key)
            .await
            .map_err(|e| CacheableError::Cache(format!("Failed to get key '{}': {}", key, e)))
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> CacheableResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;
        // SETEX rejects 0
        let ttl_secs = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(|e| CacheableError::Cache(format!("Failed to set key '{}': {}", key, e)))?;

        debug!(key, ttl_secs, "Stored cache entry");
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheableResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn
            .del(key)
            .await
            .map_err(|e| CacheableError::Cache(format!("Failed to delete key '{}': {}", key, e)))?;

        Ok(deleted > 0)
    }

    async fn exists(&self, key: &str) -> CacheableResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let mut conn = self.get_conn().await?;
        conn.exists(key)
            .await
            .map_err(|e| CacheableError::Cache(format!("Failed to check key '{}': {}", key, e)))
    }

    async fn delete_pattern(&self, pattern: &str) -> CacheableResult<u64> {
        if !self.is_enabled() {
            return Ok(0);
        }

        let mut conn = self.get_conn().await?;
        let mut cursor: u64 = 0;
        let mut deleted: u64 = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = deadpool_redis::redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut *conn)
                .await
                .map_err(|e| CacheableError::Cache(format!("Failed to scan keys: {}", e)))?;

            if !keys.is_empty() {
                let removed: u64 = conn
                    .del(&keys)
                    .await
                    .map_err(|e| CacheableError::Cache(format!("Failed to delete keys: {}", e)))?;
                deleted += removed;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        debug!(pattern, deleted, "Deleted keys matching pattern");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_store_is_a_no_op() {
        let store = RedisCacheService::disabled();
        assert!(!store.is_enabled());
        assert_eq!(store.get_raw("k").await.unwrap(), None);
        store.set_raw("k", "v", Duration::from_secs(1)).await.unwrap();
        assert!(!store.delete("k").await.unwrap());
        assert!(!store.exists("k").await.unwrap());
        assert_eq!(store.delete_pattern("k*").await.unwrap(), 0);
    }
}
