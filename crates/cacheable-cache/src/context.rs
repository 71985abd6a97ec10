//! Execution-context state consulted during key generation.
//!
//! Two pieces of state exist, neither shared across execution contexts:
//!
//! - [`RequestContext`]: headers of the request being served. Installed by the
//!   HTTP layer for the lifetime of one request future.
//! - [`LocalIdentity`]: the caller id for work that has no request at all
//!   (background jobs, tests). Only reachable through scoped acquisition, so the
//!   value is gone on every exit path including panics and early returns.

use http::{HeaderMap, HeaderName, HeaderValue};
use std::cell::Cell;
use std::future::Future;
use std::marker::PhantomData;
use tracing::warn;

tokio::task_local! {
    static ACTIVE_REQUEST: RequestContext;
    static TASK_IDENTITY: Option<i64>;
}

thread_local! {
    static THREAD_IDENTITY: Cell<Option<i64>> = const { Cell::new(None) };
}

/// The request currently being served.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    headers: HeaderMap,
}

impl RequestContext {
    /// Creates a context from request headers.
    #[must_use]
    pub fn new(headers: HeaderMap) -> Self {
        Self { headers }
    }

    /// Adds a header, ignoring names or values that are not valid HTTP.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => warn!(header = name, "Ignoring invalid request header"),
        }
        self
    }

    /// Returns a header value as text, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|v| std::str::from_utf8(v.as_bytes()).ok())
    }

    /// Runs `fut` with this context as the active request.
    pub async fn scope<F: Future>(self, fut: F) -> F::Output {
        ACTIVE_REQUEST.scope(self, fut).await
    }

    /// Runs `f` with this context as the active request.
    pub fn sync_scope<R>(self, f: impl FnOnce() -> R) -> R {
        ACTIVE_REQUEST.sync_scope(self, f)
    }

    /// Applies `f` to the active request, or returns `None` outside a request.
    pub fn try_with_current<R>(f: impl FnOnce(&RequestContext) -> R) -> Option<R> {
        ACTIVE_REQUEST.try_with(f).ok()
    }

    /// A copy of the active request, if any.
    #[must_use]
    pub fn current() -> Option<RequestContext> {
        Self::try_with_current(Clone::clone)
    }

    /// Returns true while a request is active on this task.
    #[must_use]
    pub fn is_active() -> bool {
        ACTIVE_REQUEST.try_with(|_| ()).is_ok()
    }
}

/// Caller identity for work that runs outside any request.
///
/// ```ignore
/// // async: bound to the future
/// LocalIdentity::scope(Some(402), refresh_orders()).await;
///
/// // sync: bound to the guard's lifetime
/// let _guard = LocalIdentity::enter(402);
/// ```
pub struct LocalIdentity;

impl LocalIdentity {
    /// Runs `fut` with `user_id` as the local identity.
    ///
    /// Takes precedence over any thread identity for the duration of `fut`,
    /// including when `user_id` is `None`.
    pub async fn scope<F: Future>(user_id: Option<i64>, fut: F) -> F::Output {
        TASK_IDENTITY.scope(user_id, fut).await
    }

    /// Sets `user_id` as this thread's identity until the guard is dropped.
    ///
    /// The guard is `!Send`, so it cannot be held across an `.await` in a
    /// future that may migrate between worker threads. Nested guards restore
    /// the outer value when dropped.
    #[must_use = "the identity is cleared when the guard is dropped"]
    pub fn enter(user_id: i64) -> LocalIdentityGuard {
        let previous = THREAD_IDENTITY.with(|cell| cell.replace(Some(user_id)));
        LocalIdentityGuard {
            previous,
            _not_send: PhantomData,
        }
    }

    /// Returns the identity visible to the current execution context.
    #[must_use]
    pub fn current() -> Option<i64> {
        TASK_IDENTITY
            .try_with(|user_id| *user_id)
            .unwrap_or_else(|_| THREAD_IDENTITY.with(Cell::get))
    }
}

/// Clears the thread identity set by [`LocalIdentity::enter`] on drop.
pub struct LocalIdentityGuard {
    previous: Option<i64>,
    _not_send: PhantomData<*const ()>,
}

impl Drop for LocalIdentityGuard {
    fn drop(&mut self) {
        THREAD_IDENTITY.with(|cell| cell.set(self.previous));
    }
}
