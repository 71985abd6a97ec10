//! Sample service whose results are cached.

use async_trait::async_trait;
use cacheable_cache::{
    key_params, CacheManager, CacheTarget, KeyGenerator, KeyGeneratorRegistry,
    AUTH_KEY_GENERATOR, PUBLIC_DATA_KEY_GENERATOR,
};
use cacheable_core::CacheableResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// Cache name of the shared greeting.
pub const HELLO_CACHE: &str = "hello-world";

/// Cache name of per-user profiles.
pub const PROFILE_CACHE: &str = "user-profile";

/// Time a load takes when nothing is cached.
pub const SIMULATED_LOAD: Duration = Duration::from_secs(2);

/// Profile of the calling user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// User id from the identity header, `None` for anonymous callers.
    pub user_id: Option<i64>,
    /// Display name.
    pub display_name: String,
    /// When the profile was loaded, in milliseconds since the Unix epoch.
    pub loaded_at_ms: u64,
}

/// Operations exposed over HTTP.
#[async_trait]
pub trait SampleService: Send + Sync {
    /// Greeting shared by every caller.
    async fn hello(&self) -> CacheableResult<String>;

    /// Profile of the caller of the current request.
    async fn profile(&self) -> CacheableResult<Profile>;

    /// Drops every cached greeting. Returns the number of entries removed.
    async fn clear_hello(&self) -> CacheableResult<u64>;
}

/// [`SampleService`] backed by a slow loader and a [`CacheManager`].
pub struct CachedSampleService {
    cache: CacheManager,
    public: Arc<dyn KeyGenerator>,
    auth: Arc<dyn KeyGenerator>,
    load_delay: Duration,
}

impl CachedSampleService {
    /// Creates the service with the generators registered as
    /// [`PUBLIC_DATA_KEY_GENERATOR`] and [`AUTH_KEY_GENERATOR`].
    pub fn new(cache: CacheManager, generators: &KeyGeneratorRegistry) -> CacheableResult<Self> {
        Ok(Self {
            cache,
            public: generators.require(PUBLIC_DATA_KEY_GENERATOR)?,
            auth: generators.require(AUTH_KEY_GENERATOR)?,
            load_delay: SIMULATED_LOAD,
        })
    }

    /// Overrides the simulated load time.
    #[must_use]
    pub fn with_load_delay(mut self, load_delay: Duration) -> Self {
        self.load_delay = load_delay;
        self
    }

    async fn load_hello(&self) -> CacheableResult<String> {
        info!(delay_ms = self.load_delay.as_millis() as u64, "Loading greeting from source");
        tokio::time::sleep(self.load_delay).await;
        Ok("Hello World".to_string())
    }

    async fn load_profile(&self, user_id: Option<i64>) -> CacheableResult<Profile> {
        info!(user_id = ?user_id, "Loading profile from source");
        tokio::time::sleep(self.load_delay).await;

        let display_name = match user_id {
            Some(id) => format!("user-{id}"),
            None => "anonymous".to_string(),
        };
        let loaded_at_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis() as u64);

        Ok(Profile {
            user_id,
            display_name,
            loaded_at_ms,
        })
    }
}

#[async_trait]
impl SampleService for CachedSampleService {
    async fn hello(&self) -> CacheableResult<String> {
        let target = CacheTarget::of::<Self>("hello");
        self.cache
            .cacheable(HELLO_CACHE, self.public.as_ref(), &target, &key_params![], || {
                self.load_hello()
            })
            .await
    }

    async fn profile(&self) -> CacheableResult<Profile> {
        let user_id = self.auth.caller().user_id();
        debug!(user_id = ?user_id, "Profile requested");

        let target = CacheTarget::of::<Self>("profile");
        self.cache
            .cacheable(PROFILE_CACHE, self.auth.as_ref(), &target, &key_params![], || {
                self.load_profile(user_id)
            })
            .await
    }

    async fn clear_hello(&self) -> CacheableResult<u64> {
        self.cache.clear(HELLO_CACHE).await
    }
}
