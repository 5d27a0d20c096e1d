//! Summary proxy HTTP API

pub mod admin;
pub mod handler;
pub mod helpers;
pub mod summary;

// Re-export the router for convenience
pub use handler::{AppState, SharedState, router};
