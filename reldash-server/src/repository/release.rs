//! Release Repository
//!
//! Batch retrieval of the release-management state from Postgres.

use async_trait::async_trait;
use reldash_core::domain::{Environment, Release, ReleaseBatch, Stage, StageWorkflow, Step};
use reldash_core::filter::ReleaseFilter;
use reldash_core::store::ReleaseStore;
use reldash_core::{DashboardError, Result};
use sqlx::PgPool;

const RELEASES_SQL: &str = r#"
    SELECT r.id, r.name, rs.name AS status, r.created_on, r.target_stage_id,
           r.release_path_id, rp.name AS release_path_name
    FROM releases r
    JOIN release_paths rp ON rp.id = r.release_path_id
    JOIN release_statuses rs ON rs.id = r.status_id
    WHERE $1::INTEGER[] IS NULL OR r.release_path_id = ANY($1)
    ORDER BY r.created_on DESC
    LIMIT $2
"#;

const STAGE_WORKFLOWS_SQL: &str = r#"
    SELECT release_id, stage_id
    FROM release_stage_workflows
    ORDER BY id
"#;

const STAGES_SQL: &str = r#"
    SELECT s.id, st.name, s.environment_id, s.rank, s.is_deleted
    FROM stages s
    JOIN stage_types st ON st.id = s.stage_type_id
    ORDER BY s.id
"#;

const ENVIRONMENTS_SQL: &str = r#"
    SELECT id, name
    FROM environments
    ORDER BY id
"#;

const STEPS_SQL: &str = r#"
    SELECT step.id, stt.name, sts.name AS status, step.release_id, step.stage_id,
           step.step_rank, step.trial_number AS attempt, step.created_on, step.modified_on
    FROM release_steps step
    JOIN step_types stt ON stt.id = step.step_type_id
    JOIN step_statuses sts ON sts.id = step.status_id
    ORDER BY step.id
"#;

/// Postgres-backed [`ReleaseStore`]
///
/// Each fetch runs the five statements on one pooled connection inside a
/// read-only repeatable-read transaction, so they observe a single snapshot.
/// The connection goes back to the pool when the transaction ends, whether the
/// fetch succeeded or not.
#[derive(Clone)]
pub struct PgReleaseStore {
    pool: PgPool,
}

impl PgReleaseStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_rows(&self, filter: &ReleaseFilter) -> std::result::Result<ReleaseBatch, sqlx::Error> {
        let path_ids: Option<Vec<i32>> = filter
            .release_path_ids
            .as_ref()
            .map(|ids| ids.iter().copied().collect());

        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let releases = sqlx::query_as::<_, ReleaseRow>(RELEASES_SQL)
            .bind(path_ids)
            .bind(i64::from(filter.limit.get()))
            .fetch_all(&mut *tx)
            .await?;

        let stage_workflows = sqlx::query_as::<_, StageWorkflowRow>(STAGE_WORKFLOWS_SQL)
            .fetch_all(&mut *tx)
            .await?;

        let stages = sqlx::query_as::<_, StageRow>(STAGES_SQL)
            .fetch_all(&mut *tx)
            .await?;

        let environments = sqlx::query_as::<_, EnvironmentRow>(ENVIRONMENTS_SQL)
            .fetch_all(&mut *tx)
            .await?;

        let steps = sqlx::query_as::<_, StepRow>(STEPS_SQL)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(ReleaseBatch {
            releases: releases.into_iter().map(Into::into).collect(),
            stage_workflows: stage_workflows.into_iter().map(Into::into).collect(),
            stages: stages.into_iter().map(Into::into).collect(),
            environments: environments.into_iter().map(Into::into).collect(),
            steps: steps.into_iter().map(Into::into).collect(),
        })
    }
}

#[async_trait]
impl ReleaseStore for PgReleaseStore {
    async fn fetch_batch(&self, filter: &ReleaseFilter) -> Result<ReleaseBatch> {
        self.fetch_rows(filter).await.map_err(|err| {
            tracing::error!("Release batch retrieval failed: {:?}", err);
            DashboardError::data_unavailable(format!("release batch retrieval failed: {err}"))
        })
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|err| DashboardError::data_unavailable(format!("store unreachable: {err}")))
    }
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct ReleaseRow {
    id: i32,
    name: String,
    status: String,
    created_on: chrono::DateTime<chrono::Utc>,
    target_stage_id: i32,
    release_path_id: i32,
    release_path_name: String,
}

impl From<ReleaseRow> for Release {
    fn from(row: ReleaseRow) -> Self {
        Release {
            id: row.id,
            name: row.name,
            status: row.status,
            created_on: row.created_on,
            target_stage_id: row.target_stage_id,
            release_path_id: row.release_path_id,
            release_path_name: row.release_path_name,
        }
    }
}

#[derive(sqlx::FromRow)]
struct StageWorkflowRow {
    release_id: i32,
    stage_id: i32,
}

impl From<StageWorkflowRow> for StageWorkflow {
    fn from(row: StageWorkflowRow) -> Self {
        StageWorkflow {
            release_id: row.release_id,
            stage_id: row.stage_id,
        }
    }
}

#[derive(sqlx::FromRow)]
struct StageRow {
    id: i32,
    name: String,
    environment_id: i32,
    rank: i32,
    is_deleted: bool,
}

impl From<StageRow> for Stage {
    fn from(row: StageRow) -> Self {
        Stage {
            id: row.id,
            name: row.name,
            environment_id: row.environment_id,
            rank: row.rank,
            is_deleted: row.is_deleted,
        }
    }
}

#[derive(sqlx::FromRow)]
struct EnvironmentRow {
    id: i32,
    name: String,
}

impl From<EnvironmentRow> for Environment {
    fn from(row: EnvironmentRow) -> Self {
        Environment {
            id: row.id,
            name: row.name,
        }
    }
}

#[derive(sqlx::FromRow)]
struct StepRow {
    id: i32,
    name: String,
    status: String,
    release_id: i32,
    stage_id: i32,
    step_rank: i32,
    attempt: i32,
    created_on: chrono::DateTime<chrono::Utc>,
    modified_on: chrono::DateTime<chrono::Utc>,
}

impl From<StepRow> for Step {
    fn from(row: StepRow) -> Self {
        Step {
            id: row.id,
            name: row.name,
            status: row.status,
            release_id: row.release_id,
            stage_id: row.stage_id,
            step_rank: row.step_rank,
            attempt: row.attempt,
            created_on: row.created_on,
            modified_on: row.modified_on,
        }
    }
}
