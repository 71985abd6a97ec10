//! Cache key generation.
//!
//! A key looks like
//!
//! ```text
//! {app}:{SimpleTypeName}:{method}:{userId|NONE}:{digest(params)}
//! orders-server:OrderService:getOrder:402:8d1f0c3a
//! ```
//!
//! and is stored in Redis under `{cacheName}::{key}`.

mod params;
mod registry;
mod strategy;

pub use params::KeyParams;
pub use registry::{KeyGeneratorRegistry, AUTH_KEY_GENERATOR, PUBLIC_DATA_KEY_GENERATOR};
pub use strategy::{
    AuthorizationIdentity, IdentityStrategy, PublicDataIdentity, DEFAULT_IDENTITY_HEADER,
};

use crate::context::{LocalIdentity, RequestContext};
use cacheable_config::ParamDigestKind;
use cacheable_core::CallerIdentity;
use tracing::debug;

/// Separator between the cache name and the generated key in the store.
pub const CACHE_NAME_SEPARATOR: &str = "::";

/// The type and method a cached value belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheTarget {
    type_name: String,
    method: String,
}

impl CacheTarget {
    /// Target from an explicit type name and method name.
    pub fn new(type_name: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            method: method.into(),
        }
    }

    /// Target for `method` on `T`, named by the simple type name of `T`.
    pub fn of<T: ?Sized>(method: impl Into<String>) -> Self {
        Self::new(simple_type_name::<T>(), method)
    }

    /// Simple type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Method name.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }
}

/// Last path segment of `T`'s type name, without generic arguments.
///
/// `orders::service::OrderService<Pg>` becomes `OrderService`.
#[must_use]
pub fn simple_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    let base = base.trim_start_matches(['&', '*']).trim_start_matches("mut ");
    base.rsplit("::").next().unwrap_or(base)
}

/// Produces the key a cacheable call is stored under.
pub trait KeyGenerator: Send + Sync {
    /// Derives the key for `target` called with `params`. Never fails.
    fn generate(&self, target: &CacheTarget, params: &KeyParams) -> String;

    /// Caller this generator would put in a key right now.
    fn caller(&self) -> CallerIdentity;
}

/// Key generator parameterized by how the caller is found in a request.
#[derive(Debug, Clone)]
pub struct GenericKeyGenerator<S> {
    app_name: String,
    digest: ParamDigestKind,
    strategy: S,
}

/// Per-user keys, caller read from the identity header.
pub type AuthorizationKeyGenerator = GenericKeyGenerator<AuthorizationIdentity>;

/// Shared keys, identity always `NONE`.
pub type PublicDataKeyGenerator = GenericKeyGenerator<PublicDataIdentity>;

impl<S: IdentityStrategy> GenericKeyGenerator<S> {
    /// Creates a generator for `app_name` using the fast digest.
    pub fn new(app_name: impl Into<String>, strategy: S) -> Self {
        Self {
            app_name: app_name.into(),
            digest: ParamDigestKind::Fast,
            strategy,
        }
    }

    /// Selects the argument digest.
    #[must_use]
    pub fn with_digest(mut self, digest: ParamDigestKind) -> Self {
        self.digest = digest;
        self
    }

    /// Application name prefixing every key.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// `{app}:{Type}:{method}:`
    #[must_use]
    pub fn key_prefix(&self, target: &CacheTarget) -> String {
        format!("{}:{}:{}:", self.app_name, target.type_name, target.method)
    }

    /// Caller for the current execution context.
    ///
    /// Inside a request the strategy decides; outside one the scoped local
    /// identity is used.
    pub fn resolve_identity(&self) -> CallerIdentity {
        let from_request = RequestContext::try_with_current(|request| self.strategy.user_id(request));
        let user_id = match from_request {
            Some(user_id) => {
                debug!(user_id = ?user_id, "User id in request mode");
                user_id
            }
            None => {
                let user_id = LocalIdentity::current();
                debug!(user_id = ?user_id, "User id in local mode");
                user_id
            }
        };
        CallerIdentity::from(user_id)
    }
}

impl<S: IdentityStrategy> KeyGenerator for GenericKeyGenerator<S> {
    fn generate(&self, target: &CacheTarget, params: &KeyParams) -> String {
        compose_key(
            &self.app_name,
            target,
            self.resolve_identity(),
            &params.digest(self.digest),
        )
    }

    fn caller(&self) -> CallerIdentity {
        self.resolve_identity()
    }
}

/// `{app}:{Type}:{method}:{identity}:{digest}`
fn compose_key(
    app_name: &str,
    target: &CacheTarget,
    identity: CallerIdentity,
    digest: &str,
) -> String {
    format!(
        "{}:{}:{}:{}:{}",
        app_name, target.type_name, target.method, identity, digest
    )
}

/// Key as written to the store: `{cacheName}::{key}`.
#[must_use]
pub fn store_key(cache_name: &str, key: &str) -> String {
    format!("{cache_name}{CACHE_NAME_SEPARATOR}{key}")
}

/// Computes the store key of a cacheable call without going through a
/// generator, e.g. to pre-warm or invalidate an entry from elsewhere.
///
/// Returns `{cacheName}::{app}:{Type}:{method}:{userId|NONE}:{digest}`, equal
/// to [`store_key`] applied to what a generator produces for the same inputs
/// with the fast digest.
#[must_use]
pub fn generate_key_manually(
    cache_name: &str,
    app_name: &str,
    type_name: &str,
    method_name: &str,
    user_id: Option<i64>,
    params: &KeyParams,
) -> String {
    generate_key_manually_with_digest(
        cache_name,
        app_name,
        type_name,
        method_name,
        user_id,
        params,
        ParamDigestKind::Fast,
    )
}

/// [`generate_key_manually`] for generators configured with another digest.
#[must_use]
pub fn generate_key_manually_with_digest(
    cache_name: &str,
    app_name: &str,
    type_name: &str,
    method_name: &str,
    user_id: Option<i64>,
    params: &KeyParams,
    digest: ParamDigestKind,
) -> String {
    let target = CacheTarget::new(type_name, method_name);
    let key = compose_key(app_name, &target, CallerIdentity::from(user_id), &params.digest(digest));
    store_key(cache_name, &key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key_params;

    struct OrderService;

    fn auth() -> AuthorizationKeyGenerator {
        GenericKeyGenerator::new("orders-server", AuthorizationIdentity::default())
    }

    fn public() -> PublicDataKeyGenerator {
        GenericKeyGenerator::new("orders-server", PublicDataIdentity)
    }

    fn userinfo(user_id: i64) -> RequestContext {
        RequestContext::default().with_header("userinfo", &format!(r#"{{"userId":{user_id}}}"#))
    }

    #[test]
    fn test_simple_type_name() {
        assert_eq!(simple_type_name::<OrderService>(), "OrderService");
        assert_eq!(simple_type_name::<Vec<OrderService>>(), "Vec");
        assert_eq!(simple_type_name::<&OrderService>(), "OrderService");
        assert_eq!(simple_type_name::<str>(), "str");
    }

    #[test]
    fn test_cache_target_of() {
        let target = CacheTarget::of::<OrderService>("getOrder");
        assert_eq!(target.type_name(), "OrderService");
        assert_eq!(target.method(), "getOrder");
    }

    #[test]
    fn test_key_with_local_identity() {
        let target = CacheTarget::of::<OrderService>("getOrder");
        let params = key_params!["abc"];
        let digest = params.digest(ParamDigestKind::Fast);

        let _guard = LocalIdentity::enter(402);
        assert_eq!(
            auth().generate(&target, &params),
            format!("orders-server:OrderService:getOrder:402:{digest}")
        );
    }

    #[test]
    fn test_key_without_identity() {
        let target = CacheTarget::of::<OrderService>("getOrder");
        let params = key_params!["abc"];
        let digest = params.digest(ParamDigestKind::Fast);

        assert_eq!(
            auth().generate(&target, &params),
            format!("orders-server:OrderService:getOrder:NONE:{digest}")
        );
    }

    #[test]
    fn test_generate_is_deterministic() {
        let target = CacheTarget::of::<OrderService>("listOrders");
        let params = key_params![1, 20, "desc"];
        let _guard = LocalIdentity::enter(5);
        let generator = auth();
        assert_eq!(generator.generate(&target, &params), generator.generate(&target, &params));
    }

    #[test]
    fn test_identities_differ_only_in_identity_segment() {
        let target = CacheTarget::of::<OrderService>("getOrder");
        let params = key_params!["abc"];
        let generator = auth();

        let first = userinfo(1).sync_scope(|| generator.generate(&target, &params));
        let second = userinfo(2).sync_scope(|| generator.generate(&target, &params));

        let a: Vec<&str> = first.split(':').collect();
        let b: Vec<&str> = second.split(':').collect();
        assert_eq!(a.len(), 5);
        assert_eq!(a[3], "1");
        assert_eq!(b[3], "2");
        for i in [0, 1, 2, 4] {
            assert_eq!(a[i], b[i]);
        }
    }

    #[test]
    fn test_argument_order_changes_digest() {
        let target = CacheTarget::of::<OrderService>("search");
        let generator = public();
        assert_ne!(
            generator.generate(&target, &key_params!["a", "b"]),
            generator.generate(&target, &key_params!["b", "a"])
        );
    }

    #[test]
    fn test_request_takes_precedence_over_local_identity() {
        let target = CacheTarget::of::<OrderService>("getOrder");
        let _guard = LocalIdentity::enter(99);
        let key = userinfo(7).sync_scope(|| auth().generate(&target, &key_params![]));
        assert!(key.contains(":7:"));

        let anonymous = RequestContext::default().sync_scope(|| auth().generate(&target, &key_params![]));
        assert!(anonymous.contains(":NONE:"));
    }

    #[test]
    fn test_public_generator_ignores_identity() {
        let target = CacheTarget::of::<OrderService>("catalog");
        let key = userinfo(402).sync_scope(|| public().generate(&target, &key_params![]));
        assert_eq!(key, "orders-server:OrderService:catalog:NONE:00000001");
    }

    #[test]
    fn test_manual_key_matches_generated_store_key() {
        let target = CacheTarget::of::<OrderService>("getOrder");
        let params = key_params!["abc", 3];

        let generated = {
            let _guard = LocalIdentity::enter(402);
            auth().generate(&target, &params)
        };
        let manual = generate_key_manually(
            "orders",
            "orders-server",
            "OrderService",
            "getOrder",
            Some(402),
            &params,
        );

        assert_eq!(manual, store_key("orders", &generated));
        assert_eq!(manual.strip_prefix("orders::"), Some(generated.as_str()));
    }

    #[test]
    fn test_manual_key_parity_with_sha256_digest() {
        let target = CacheTarget::of::<OrderService>("getOrder");
        let params = key_params!["abc"];
        let generator = public().with_digest(ParamDigestKind::Sha256);

        let manual = generate_key_manually_with_digest(
            "orders",
            generator.app_name(),
            "OrderService",
            "getOrder",
            None,
            &params,
            ParamDigestKind::Sha256,
        );
        assert_eq!(manual, store_key("orders", &generator.generate(&target, &params)));
    }

    #[test]
    fn test_caller_through_trait_object() {
        let generator: Box<dyn KeyGenerator> = Box::new(auth());
        assert_eq!(userinfo(12).sync_scope(|| generator.caller().user_id()), Some(12));
        assert_eq!(generator.caller().user_id(), None);
    }

    #[test]
    fn test_key_prefix() {
        let target = CacheTarget::new("XServiceImpl", "getUsers");
        assert_eq!(auth().key_prefix(&target), "orders-server:XServiceImpl:getUsers:");
    }
}
