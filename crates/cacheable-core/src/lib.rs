//! # Cacheable Core
//!
//! Core types and error definitions shared by every Cacheable crate:
//! the unified error type, the caller identity value, and telemetry setup.

pub mod error;
pub mod identity;
pub mod result;
pub mod telemetry;

pub use error::*;
pub use identity::*;
pub use result::*;
