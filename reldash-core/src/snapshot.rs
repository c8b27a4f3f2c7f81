//! Snapshot building

use chrono::{DateTime, Utc};

use crate::dto::{ReleaseNode, Snapshot};

/// Wrap an assembled release tree with its capture instant
///
/// `captured_at` is the moment the fetch was started, not when assembly
/// finished.
pub fn build_snapshot(captured_at: DateTime<Utc>, releases: Vec<ReleaseNode>) -> Snapshot {
    Snapshot {
        last_refresh: captured_at,
        releases,
    }
}
