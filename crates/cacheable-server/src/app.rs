//! Application builder.

use crate::{
    di::build_cache_module,
    router::create_router,
    service::CachedSampleService,
    startup::print_startup_info,
    state::AppState,
};
use axum::Router;
use cacheable_cache::{CacheInterface, CacheManager, KeyGeneratorRegistry};
use cacheable_config::AppConfig;
use cacheable_core::{CacheableError, CacheableResult};
use shaku::HasComponent;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

/// Application builder for constructing the server.
pub struct AppBuilder {
    config: Option<AppConfig>,
    cache_store: Option<Arc<dyn CacheInterface>>,
    key_generators: Option<KeyGeneratorRegistry>,
}

impl AppBuilder {
    /// Creates a new application builder.
    pub fn new() -> Self {
        Self {
            config: None,
            cache_store: None,
            key_generators: None,
        }
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Uses `store` instead of the one built from the Redis configuration.
    #[must_use]
    pub fn with_cache_store(mut self, store: Arc<dyn CacheInterface>) -> Self {
        self.cache_store = Some(store);
        self
    }

    /// Uses `generators` instead of the defaults for the configured application.
    #[must_use]
    pub fn with_key_generators(mut self, generators: KeyGeneratorRegistry) -> Self {
        self.key_generators = Some(generators);
        self
    }

    /// Wires the cache store, cache manager and sample service into a router.
    pub async fn build(self) -> CacheableResult<(AppConfig, Router)> {
        let config = self.config.unwrap_or_default();

        let store: Arc<dyn CacheInterface> = match self.cache_store {
            Some(store) => store,
            None => build_cache_module(&config.redis).await?.resolve(),
        };

        let manager = CacheManager::from_config(store.clone(), &config.cacheable)?;
        print_startup_info(&config.server.addr(), manager.ttl());

        let generators = self.key_generators.unwrap_or_else(|| {
            KeyGeneratorRegistry::with_defaults(&config.app.name, &config.cacheable)
        });
        let service = CachedSampleService::new(manager, &generators)?;
        let state = AppState::new(Arc::new(service), store);
        let router = create_router(state, &config.server);

        Ok((config, router))
    }

    /// Builds the application and serves it until a shutdown signal.
    pub async fn run(self) -> CacheableResult<()> {
        let (config, router) = self.build().await?;

        let addr = config.server.addr();
        info!("Starting HTTP server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| CacheableError::internal(format!("Failed to bind {}: {}", addr, e)))?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| CacheableError::internal(format!("HTTP server error: {}", e)))?;

        info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Completes on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cacheable_config::CacheNameTtl;

    fn offline_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.redis.enabled = false;
        config
    }

    #[test]
    fn test_app_builder_default() {
        let builder = AppBuilder::default();
        assert!(builder.config.is_none());
        assert!(builder.cache_store.is_none());
        assert!(builder.key_generators.is_none());
    }

    #[tokio::test]
    async fn test_build_without_redis() {
        let (config, _router) = AppBuilder::new()
            .with_config(offline_config())
            .build()
            .await
            .unwrap();
        assert!(!config.redis.enabled);
    }

    #[tokio::test]
    async fn test_build_rejects_unknown_unit() {
        let mut config = offline_config();
        config.cacheable = config
            .cacheable
            .with_cache("hello-world", CacheNameTtl::new(2, "WEEKS"));

        let err = AppBuilder::new().with_config(config).build().await.err().unwrap();
        assert!(err.to_string().contains("hello-world"));
    }

    #[tokio::test]
    async fn test_build_rejects_missing_key_generator() {
        let err = AppBuilder::new()
            .with_config(offline_config())
            .with_key_generators(KeyGeneratorRegistry::new())
            .build()
            .await
            .err()
            .unwrap();
        assert!(err.to_string().contains("PUBLIC_DATA_KEY_GENERATOR"));
    }
}
