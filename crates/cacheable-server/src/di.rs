//! Dependency injection module.

use cacheable_cache::{create_pool, RedisCacheService, RedisCacheServiceParameters};
use cacheable_config::RedisConfig;
use cacheable_core::CacheableResult;
use shaku::module;
use std::sync::Arc;
use tracing::warn;

// Cache store for the sample server. Redis when enabled, otherwise a store
// that always misses.
module! {
    pub CacheModule {
        components = [
            RedisCacheService,
        ],
        providers = [],
    }
}

/// Builds the cache module, connecting to Redis when it is enabled.
pub async fn build_cache_module(redis_config: &RedisConfig) -> CacheableResult<Arc<CacheModule>> {
    let pool = if redis_config.enabled {
        Some(Arc::new(create_pool(redis_config).await?))
    } else {
        warn!("Redis is disabled, results will not be cached");
        None
    };

    let module = CacheModule::builder()
        .with_component_parameters::<RedisCacheService>(RedisCacheServiceParameters { pool })
        .build();

    Ok(Arc::new(module))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cacheable_cache::CacheInterface;
    use shaku::HasComponent;

    #[tokio::test]
    async fn test_disabled_redis_resolves_no_op_store() {
        let config = RedisConfig {
            enabled: false,
            ..RedisConfig::default()
        };
        let module = build_cache_module(&config).await.unwrap();
        let store: Arc<dyn CacheInterface> = module.resolve();
        assert!(!store.is_enabled());
    }
}
