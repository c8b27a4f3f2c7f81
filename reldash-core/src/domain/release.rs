//! Release pipeline domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One deployment progressing through a release pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub id: i32,
    pub name: String,
    /// Status name, e.g. "InProgress"
    pub status: String,
    pub created_on: DateTime<Utc>,
    pub target_stage_id: i32,
    pub release_path_id: i32,
    pub release_path_name: String,
}

impl Release {
    /// The release path this release belongs to
    pub fn release_path(&self) -> ReleasePath {
        ReleasePath {
            id: self.release_path_id,
            name: self.release_path_name.clone(),
        }
    }
}

/// Named grouping of releases, used for filtering
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReleasePath {
    pub id: i32,
    pub name: String,
}

/// Association stating that a stage participates in a release's pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageWorkflow {
    pub release_id: i32,
    pub stage_id: i32,
}

/// Pipeline phase bound to an environment
///
/// Not scoped to a release by itself; see [`StageWorkflow`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub id: i32,
    /// Stage type name, e.g. "QA"
    pub name: String,
    pub environment_id: i32,
    pub rank: i32,
    pub is_deleted: bool,
}

/// Target system a stage deploys into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub id: i32,
    pub name: String,
}

/// Unit of work executed within a stage during a release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: i32,
    /// Step type name, e.g. "Deploy"
    pub name: String,
    pub status: String,
    pub release_id: i32,
    pub stage_id: i32,
    pub step_rank: i32,
    /// Trial number; retries of a step share its rank with a higher attempt
    pub attempt: i32,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
}

/// The five row-sets fetched together for one request
///
/// `releases` is already filtered, ordered newest first and truncated. The
/// other sets are the full current state of the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseBatch {
    pub releases: Vec<Release>,
    pub stage_workflows: Vec<StageWorkflow>,
    pub stages: Vec<Stage>,
    pub environments: Vec<Environment>,
    pub steps: Vec<Step>,
}

impl ReleaseBatch {
    /// Total number of rows across all five sets
    pub fn row_count(&self) -> usize {
        self.releases.len()
            + self.stage_workflows.len()
            + self.stages.len()
            + self.environments.len()
            + self.steps.len()
    }
}
