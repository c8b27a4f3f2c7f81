//! Data Transfer Objects served to dashboard clients
//!
//! These types fix the JSON shape of the dashboard response. Field names are
//! camelCase on the wire.

pub mod snapshot;

pub use snapshot::{ReleaseNode, Snapshot, StageNode, StepNode};
