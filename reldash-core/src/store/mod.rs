//! Release store contract
//!
//! The dashboard reads everything it needs through one batched retrieval.
//! The server provides the Postgres implementation; [`memory`] holds an
//! in-process implementation used for tests and demos.

pub mod memory;

use async_trait::async_trait;

use crate::domain::ReleaseBatch;
use crate::error::Result;
use crate::filter::ReleaseFilter;

pub use memory::MemoryReleaseStore;

/// Retrieval capability backing the dashboard
#[async_trait]
pub trait ReleaseStore: Send + Sync {
    /// Fetches the five row-sets for one request
    ///
    /// Releases are restricted to the filter's release paths, ordered by
    /// creation time (newest first) and truncated to the filter's limit. The
    /// other row-sets are returned unfiltered.
    ///
    /// Either all five sets are returned or the call fails with
    /// [`DashboardError::DataUnavailable`](crate::DashboardError::DataUnavailable).
    async fn fetch_batch(&self, filter: &ReleaseFilter) -> Result<ReleaseBatch>;

    /// Checks that the store can currently be reached
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
