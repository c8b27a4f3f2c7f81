//! Reldash Core
//!
//! Core types and logic for the release dashboard.
//!
//! This crate contains:
//! - Domain types: the flat row-sets read from the release-management store
//! - DTOs: the Release → Stage → Step tree served to dashboard clients
//! - The request pipeline stages that need no I/O: filter resolution,
//!   hierarchy assembly and snapshot building
//! - The `ReleaseStore` retrieval contract implemented by the server
//!
//! Note: Persistence lives in the server crate; nothing here touches a database.

pub mod domain;
pub mod dto;
pub mod error;
pub mod filter;
pub mod hierarchy;
pub mod snapshot;
pub mod store;

pub use error::{DashboardError, Result};
