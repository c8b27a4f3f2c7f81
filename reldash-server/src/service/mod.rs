//! Service Module
//!
//! Business logic layer for the dashboard server.
//! Services run the request pipeline between the store and the API layer.

pub mod release;

// Re-export for convenience
pub use release as release_service;
