//! Core domain types
//!
//! This module contains the flat records read from the release-management
//! store. They are immutable snapshots: the dashboard only ever reads them.

pub mod release;

pub use release::{Environment, Release, ReleaseBatch, ReleasePath, Stage, StageWorkflow, Step};
