//! Named key generators selectable from configuration.

use super::{
    AuthorizationIdentity, GenericKeyGenerator, KeyGenerator, PublicDataIdentity,
};
use cacheable_config::CacheableConfig;
use cacheable_core::{CacheableError, CacheableResult};
use std::collections::HashMap;
use std::sync::Arc;

/// Name of the per-user key generator.
pub const AUTH_KEY_GENERATOR: &str = "AUTH_KEY_GENERATOR";

/// Name of the shared-data key generator.
pub const PUBLIC_DATA_KEY_GENERATOR: &str = "PUBLIC_DATA_KEY_GENERATOR";

/// Key generators by name.
#[derive(Clone, Default)]
pub struct KeyGeneratorRegistry {
    generators: HashMap<String, Arc<dyn KeyGenerator>>,
}

impl KeyGeneratorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding [`AUTH_KEY_GENERATOR`] and [`PUBLIC_DATA_KEY_GENERATOR`].
    #[must_use]
    pub fn with_defaults(app_name: &str, config: &CacheableConfig) -> Self {
        let auth = GenericKeyGenerator::new(
            app_name,
            AuthorizationIdentity::new(config.identity_header.clone()),
        )
        .with_digest(config.param_digest);
        let public =
            GenericKeyGenerator::new(app_name, PublicDataIdentity).with_digest(config.param_digest);

        Self::new()
            .register(AUTH_KEY_GENERATOR, Arc::new(auth))
            .register(PUBLIC_DATA_KEY_GENERATOR, Arc::new(public))
    }

    /// Adds or replaces a generator.
    #[must_use]
    pub fn register(mut self, name: impl Into<String>, generator: Arc<dyn KeyGenerator>) -> Self {
        self.generators.insert(name.into(), generator);
        self
    }

    /// Looks up a generator.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn KeyGenerator>> {
        self.generators.get(name).cloned()
    }

    /// Looks up a generator that configuration refers to.
    pub fn require(&self, name: &str) -> CacheableResult<Arc<dyn KeyGenerator>> {
        self.get(name).ok_or_else(|| {
            CacheableError::configuration(format!("Unknown key generator '{}'", name))
        })
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.generators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
