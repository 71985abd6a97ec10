//! # Cacheable Server
//!
//! Sample HTTP server built on the Cacheable caching add-on. It serves a
//! slow greeting cached for every caller and a profile cached per caller,
//! and wires Redis, configuration and tracing the way a real service would.

pub mod app;
pub mod controllers;
pub mod di;
pub mod middleware;
pub mod responses;
pub mod router;
pub mod service;
pub mod startup;
pub mod state;

pub use app::AppBuilder;
pub use router::create_router;
pub use state::AppState;
