//! # Cacheable Cache
//!
//! Declarative result caching for request-handling services.
//!
//! - [`key`] derives `{app}:{Type}:{method}:{user|NONE}:{digest}` keys, with
//!   the caller taken from the active request or from a scoped local identity.
//! - [`ttl`] resolves per cache-name expirations with a random offset.
//! - [`store`] talks to Redis.
//! - [`manager`] ties them together: look up, load on miss, write back.

pub mod context;
pub mod key;
pub mod manager;
pub mod store;
pub mod ttl;

pub use context::{LocalIdentity, LocalIdentityGuard, RequestContext};
pub use key::*;
pub use manager::{CacheManager, CacheManagerOptions};
pub use store::{create_pool, CacheInterface, RedisCacheService, RedisCacheServiceParameters};
pub use ttl::{CachePolicy, TtlResolver};
