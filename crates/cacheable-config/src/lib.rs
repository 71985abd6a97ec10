//! # Cacheable Config
//!
//! Configuration management for Cacheable.
//! Supports layered configuration from files and environment variables,
//! validated once at startup so a bad cache policy fails fast.

mod app_config;
mod loader;
mod units;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use units::*;
pub use validation::*;
