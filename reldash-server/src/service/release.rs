//! Release Service
//!
//! Runs the dashboard pipeline for one request: resolve the filter, fetch the
//! batch, assemble the tree, stamp the snapshot. Each call is independent and
//! shares nothing with concurrent calls beyond the store's connection pool.

use chrono::Utc;
use reldash_core::dto::Snapshot;
use reldash_core::filter::{RequestMetadata, resolve_filter};
use reldash_core::hierarchy::assemble;
use reldash_core::snapshot::build_snapshot;
use reldash_core::store::ReleaseStore;
use reldash_core::{DashboardError, Result};
use std::time::Duration;

/// Build the dashboard snapshot for one request
pub async fn get_snapshot(
    store: &dyn ReleaseStore,
    metadata: &RequestMetadata,
    fetch_timeout: Duration,
) -> Result<Snapshot> {
    let filter = resolve_filter(metadata)?;

    tracing::debug!(
        "Fetching releases: paths={:?}, limit={}",
        filter.release_path_ids,
        filter.limit
    );

    let captured_at = Utc::now();
    let batch = tokio::time::timeout(fetch_timeout, store.fetch_batch(&filter))
        .await
        .map_err(|_| {
            DashboardError::data_unavailable(format!(
                "release batch retrieval timed out after {}s",
                fetch_timeout.as_secs_f64()
            ))
        })??;

    tracing::debug!(
        "Fetched {} rows ({} releases, {} stages, {} steps)",
        batch.row_count(),
        batch.releases.len(),
        batch.stages.len(),
        batch.steps.len()
    );

    let releases = assemble(&batch)?;

    tracing::info!("Assembled snapshot with {} releases", releases.len());

    Ok(build_snapshot(captured_at, releases))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Duration as ChronoDuration, TimeZone};
    use reldash_core::domain::{Environment, Release, ReleaseBatch, Stage, StageWorkflow, Step};
    use reldash_core::filter::{INCLUDED_RELEASE_PATH_IDS, RELEASE_COUNT, ReleaseFilter};
    use reldash_core::store::MemoryReleaseStore;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap() + ChronoDuration::minutes(minutes)
    }

    fn release(id: i32, path: i32, minutes: i64) -> Release {
        Release {
            id,
            name: format!("R{id}"),
            status: "InProgress".to_string(),
            created_on: at(minutes),
            target_stage_id: 0,
            release_path_id: path,
            release_path_name: format!("P{path}"),
        }
    }

    fn stage(id: i32, rank: i32) -> Stage {
        Stage {
            id,
            name: format!("S{id}"),
            environment_id: 1,
            rank,
            is_deleted: false,
        }
    }

    fn step(id: i32, release_id: i32, stage_id: i32, attempt: i32, step_rank: i32) -> Step {
        Step {
            id,
            name: format!("step-{id}"),
            status: "Done".to_string(),
            release_id,
            stage_id,
            step_rank,
            attempt,
            created_on: at(100 + id as i64),
            modified_on: at(100 + id as i64),
        }
    }

    fn metadata(pairs: &[(&str, &str)]) -> RequestMetadata {
        pairs.iter().copied().collect()
    }

    fn names(snapshot: &Snapshot) -> Vec<&str> {
        snapshot.releases.iter().map(|r| r.name.as_str()).collect()
    }

    fn store(batch: ReleaseBatch) -> MemoryReleaseStore {
        MemoryReleaseStore::new(batch)
    }

    #[tokio::test]
    async fn test_limit_keeps_newest_release() {
        // R1 created later than R2
        let store = store(ReleaseBatch {
            releases: vec![release(2, 1, 0), release(1, 1, 10)],
            ..ReleaseBatch::default()
        });

        let snapshot = get_snapshot(&store, &metadata(&[(RELEASE_COUNT, "1")]), TIMEOUT)
            .await
            .unwrap();
        assert_eq!(names(&snapshot), vec!["R1"]);
    }

    #[tokio::test]
    async fn test_release_count_is_min_of_limit_and_available() {
        let store = store(ReleaseBatch {
            releases: (1..=8).map(|id| release(id, 1, id as i64)).collect(),
            ..ReleaseBatch::default()
        });

        let snapshot = get_snapshot(&store, &metadata(&[]), TIMEOUT).await.unwrap();
        assert_eq!(names(&snapshot), vec!["R8", "R7", "R6", "R5", "R4"]);

        let snapshot = get_snapshot(&store, &metadata(&[(RELEASE_COUNT, "20")]), TIMEOUT)
            .await
            .unwrap();
        assert_eq!(snapshot.releases.len(), 8);
        assert!(
            snapshot
                .releases
                .windows(2)
                .all(|pair| pair[0].created_on >= pair[1].created_on)
        );
    }

    #[tokio::test]
    async fn test_path_filter_excludes_other_paths() {
        let store = store(ReleaseBatch {
            releases: vec![release(1, 1, 0), release(2, 2, 50), release(3, 1, 20)],
            ..ReleaseBatch::default()
        });

        let snapshot = get_snapshot(
            &store,
            &metadata(&[(INCLUDED_RELEASE_PATH_IDS, "1"), (RELEASE_COUNT, "2")]),
            TIMEOUT,
        )
        .await
        .unwrap();
        assert_eq!(names(&snapshot), vec!["R3", "R1"]);
        assert!(snapshot.releases.iter().all(|r| r.release_path_name == "P1"));
    }

    #[tokio::test]
    async fn test_full_tree() {
        let store = store(ReleaseBatch {
            releases: vec![release(1, 1, 0)],
            stage_workflows: vec![
                StageWorkflow {
                    release_id: 1,
                    stage_id: 1,
                },
                StageWorkflow {
                    release_id: 1,
                    stage_id: 2,
                },
            ],
            stages: vec![stage(1, 2), stage(2, 1), stage(3, 0)],
            environments: vec![Environment {
                id: 1,
                name: "prod".to_string(),
            }],
            steps: vec![step(11, 1, 1, 2, 1), step(10, 1, 1, 1, 1), step(12, 1, 2, 1, 1)],
        });

        let snapshot = get_snapshot(&store, &metadata(&[]), TIMEOUT).await.unwrap();
        let stages = &snapshot.releases[0].stages;
        assert_eq!(stages.iter().map(|s| s.id).collect::<Vec<_>>(), vec![2, 1]);
        assert!(stages.iter().all(|s| s.environment == "prod"));
        assert_eq!(
            stages[1].steps.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![10, 11]
        );
        assert_eq!(stages[0].steps.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_filter_rejected_before_fetch() {
        let store = store(ReleaseBatch::default());
        let err = get_snapshot(&store, &metadata(&[(RELEASE_COUNT, "abc")]), TIMEOUT)
            .await
            .unwrap_err();
        assert!(err.is_client_error());
    }

    struct FailingStore;

    #[async_trait]
    impl ReleaseStore for FailingStore {
        async fn fetch_batch(&self, _filter: &ReleaseFilter) -> Result<ReleaseBatch> {
            Err(DashboardError::data_unavailable("connection refused"))
        }
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let err = get_snapshot(&FailingStore, &metadata(&[]), TIMEOUT)
            .await
            .unwrap_err();
        assert_eq!(err, DashboardError::data_unavailable("connection refused"));
    }

    struct SlowStore;

    #[async_trait]
    impl ReleaseStore for SlowStore {
        async fn fetch_batch(&self, _filter: &ReleaseFilter) -> Result<ReleaseBatch> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(ReleaseBatch::default())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_timeout_is_data_unavailable() {
        let err = get_snapshot(&SlowStore, &metadata(&[]), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::DataUnavailable(ref msg) if msg.contains("timed out")));
    }

    #[tokio::test]
    async fn test_last_refresh_is_capture_time() {
        let store = store(ReleaseBatch::default());
        let before = Utc::now();
        let snapshot = get_snapshot(&store, &metadata(&[]), TIMEOUT).await.unwrap();
        let after = Utc::now();
        assert!(snapshot.last_refresh >= before && snapshot.last_refresh <= after);
    }
}
