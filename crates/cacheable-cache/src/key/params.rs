//! Call arguments and their digest.

use cacheable_config::ParamDigestKind;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::warn;

/// Ordered call arguments of a cacheable method, in structural (JSON) form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyParams(Vec<Value>);

impl KeyParams {
    /// Creates an empty argument list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends an argument.
    #[must_use]
    pub fn with<T: Serialize + ?Sized>(mut self, param: &T) -> Self {
        self.push(param);
        self
    }

    /// Appends an argument. Arguments that fail to serialize become `null`.
    pub fn push<T: Serialize + ?Sized>(&mut self, param: &T) {
        let value = serde_json::to_value(param).unwrap_or_else(|e| {
            warn!(
                error = %e,
                position = self.0.len(),
                "Cache key argument is not serializable, using null"
            );
            Value::Null
        });
        self.0.push(value);
    }

    /// Number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when there are no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders the argument digest used as the last key segment.
    #[must_use]
    pub fn digest(&self, kind: ParamDigestKind) -> String {
        match kind {
            ParamDigestKind::Fast => format!("{:08x}", self.fast_hash()),
            ParamDigestKind::Sha256 => {
                let encoded = serde_json::to_vec(&self.0).unwrap_or_default();
                hex::encode(Sha256::digest(encoded))
            }
        }
    }

    /// Order-sensitive 32-bit hash: `h = 31 * h + hash(arg)` starting at 1.
    ///
    /// Not collision resistant. Two different argument lists can share a
    /// digest and therefore a cache entry; use [`ParamDigestKind::Sha256`]
    /// where that matters.
    fn fast_hash(&self) -> u32 {
        self.0.iter().fold(1u32, |hash, value| {
            hash.wrapping_mul(31).wrapping_add(value_hash(value))
        })
    }
}

fn value_hash(value: &Value) -> u32 {
    match value {
        Value::Null => 0,
        other => other
            .to_string()
            .bytes()
            .fold(0u32, |hash, b| hash.wrapping_mul(31).wrapping_add(u32::from(b))),
    }
}

impl From<Vec<Value>> for KeyParams {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

/// Builds [`KeyParams`] from serializable expressions, in order.
///
/// ```
/// use cacheable_cache::key_params;
///
/// let order_id = "abc";
/// let params = key_params![order_id, 2u32];
/// assert_eq!(params.len(), 2);
/// ```
#[macro_export]
macro_rules! key_params {
    () => {
        $crate::KeyParams::new()
    };
    ($($param:expr),+ $(,)?) => {
        $crate::KeyParams::new()$(.with(&$param))+
    };
}
