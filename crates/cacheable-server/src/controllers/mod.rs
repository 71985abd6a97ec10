//! HTTP controllers.

pub mod health_controller;
pub mod hello_controller;
pub mod profile_controller;
