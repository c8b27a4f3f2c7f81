//! In-memory release store

use async_trait::async_trait;
use std::sync::RwLock;

use crate::domain::ReleaseBatch;
use crate::error::{DashboardError, Result};
use crate::filter::ReleaseFilter;

use super::ReleaseStore;

/// Release store holding its rows in memory
///
/// Applies the same release selection as the Postgres store: path filter,
/// newest first, then truncation. The other row-sets are returned as stored.
#[derive(Debug, Default)]
pub struct MemoryReleaseStore {
    rows: RwLock<ReleaseBatch>,
}

impl MemoryReleaseStore {
    pub fn new(rows: ReleaseBatch) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    /// Replace the stored rows
    pub fn replace(&self, rows: ReleaseBatch) -> Result<()> {
        let mut guard = self
            .rows
            .write()
            .map_err(|_| DashboardError::data_unavailable("in-memory store lock poisoned"))?;
        *guard = rows;
        Ok(())
    }
}

#[async_trait]
impl ReleaseStore for MemoryReleaseStore {
    async fn fetch_batch(&self, filter: &ReleaseFilter) -> Result<ReleaseBatch> {
        let rows = self
            .rows
            .read()
            .map_err(|_| DashboardError::data_unavailable("in-memory store lock poisoned"))?;

        let mut releases: Vec<_> = rows
            .releases
            .iter()
            .filter(|release| filter.includes_path(release.release_path_id))
            .cloned()
            .collect();
        releases.sort_by(|a, b| b.created_on.cmp(&a.created_on));
        releases.truncate(filter.limit.get() as usize);

        Ok(ReleaseBatch {
            releases,
            stage_workflows: rows.stage_workflows.clone(),
            stages: rows.stages.clone(),
            environments: rows.environments.clone(),
            steps: rows.steps.clone(),
        })
    }
}
