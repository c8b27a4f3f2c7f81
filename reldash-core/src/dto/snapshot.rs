//! Release tree DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Complete dashboard response for one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// When the data was captured, i.e. when the fetch started
    pub last_refresh: DateTime<Utc>,
    pub releases: Vec<ReleaseNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseNode {
    pub name: String,
    pub status: String,
    pub created_on: DateTime<Utc>,
    pub target_stage_id: i32,
    pub release_path_name: String,
    pub stages: Vec<StageNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageNode {
    pub id: i32,
    pub name: String,
    pub rank: i32,
    /// Environment name
    pub environment: String,
    pub steps: Vec<StepNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepNode {
    pub id: i32,
    pub name: String,
    pub status: String,
    pub rank: i32,
    pub created_on: DateTime<Utc>,
}
