//! Repository Module
//!
//! Data access layer for the dashboard server.

pub mod release;

// Re-export for convenience
pub use release::PgReleaseStore;
pub use release as release_repository;
