//! Caller identity attached to a cacheable invocation.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Literal used in cache keys when no caller identity is known.
pub const ANONYMOUS_MARKER: &str = "NONE";

/// The caller a cached value belongs to.
///
/// Per-user entries carry the numeric user id; public data is shared by
/// every caller and keyed under [`ANONYMOUS_MARKER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CallerIdentity {
    /// Authenticated caller.
    User(i64),
    /// No identity: public/shared data.
    #[default]
    Anonymous,
}

impl CallerIdentity {
    /// Returns the user id, if any.
    #[must_use]
    pub const fn user_id(self) -> Option<i64> {
        match self {
            Self::User(id) => Some(id),
            Self::Anonymous => None,
        }
    }

    /// Returns true for the public bucket.
    #[must_use]
    pub const fn is_anonymous(self) -> bool {
        matches!(self, Self::Anonymous)
    }
}

impl From<Option<i64>> for CallerIdentity {
    fn from(user_id: Option<i64>) -> Self {
        user_id.map_or(Self::Anonymous, Self::User)
    }
}

impl Display for CallerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(id) => write!(f, "{id}"),
            Self::Anonymous => f.write_str(ANONYMOUS_MARKER),
        }
    }
}
