//! Result type aliases for Cacheable.

use crate::CacheableError;

/// A specialized `Result` type for Cacheable operations.
pub type CacheableResult<T> = Result<T, CacheableError>;
