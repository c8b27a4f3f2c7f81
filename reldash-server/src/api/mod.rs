//! API Module
//!
//! HTTP API layer for the dashboard server.
//! Each submodule handles endpoints for a specific domain.

pub mod error;
pub mod health;
pub mod release;

use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::get,
};
use reldash_core::store::ReleaseStore;
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::error::ApiError;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ReleaseStore>,
    pub fetch_timeout: Duration,
}

/// Create the main API router with all endpoints
pub fn create_router(state: AppState, cors_enabled: bool) -> Router {
    let router = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Dashboard endpoints
        .route("/api/releases", get(release::get_releases))
        // Add state and middleware
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http());

    if cors_enabled {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// Render a handler panic as an opaque 500 carrying the panic message
fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else {
        "Unexpected failure while building the dashboard".to_string()
    };

    ApiError::InternalError(message).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use chrono::{TimeZone, Utc};
    use reldash_core::domain::{Environment, Release, ReleaseBatch, Stage, StageWorkflow, Step};
    use reldash_core::filter::ReleaseFilter;
    use reldash_core::store::MemoryReleaseStore;
    use tower::ServiceExt;

    fn sample_batch() -> ReleaseBatch {
        let created = Utc.with_ymd_and_hms(2024, 4, 2, 10, 0, 0).unwrap();
        ReleaseBatch {
            releases: vec![
                Release {
                    id: 1,
                    name: "Web 1.0".to_string(),
                    status: "Released".to_string(),
                    created_on: created,
                    target_stage_id: 20,
                    release_path_id: 1,
                    release_path_name: "Web".to_string(),
                },
                Release {
                    id: 2,
                    name: "Api 3.1".to_string(),
                    status: "InProgress".to_string(),
                    created_on: created + chrono::Duration::hours(1),
                    target_stage_id: 20,
                    release_path_id: 2,
                    release_path_name: "Api".to_string(),
                },
            ],
            stage_workflows: vec![StageWorkflow {
                release_id: 1,
                stage_id: 20,
            }],
            stages: vec![Stage {
                id: 20,
                name: "Production".to_string(),
                environment_id: 5,
                rank: 3,
                is_deleted: false,
            }],
            environments: vec![Environment {
                id: 5,
                name: "prod-west".to_string(),
            }],
            steps: vec![Step {
                id: 300,
                name: "Deploy".to_string(),
                status: "Done".to_string(),
                release_id: 1,
                stage_id: 20,
                step_rank: 2,
                attempt: 1,
                created_on: created,
                modified_on: created,
            }],
        }
    }

    fn app(store: impl ReleaseStore + 'static) -> Router {
        create_router(
            AppState {
                store: Arc::new(store),
                fetch_timeout: Duration::from_secs(5),
            },
            true,
        )
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null))
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(MemoryReleaseStore::default())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_releases_json_shape() {
        let (status, json) = send(
            app(MemoryReleaseStore::new(sample_batch())),
            Request::get("/api/releases").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(json["lastRefresh"].is_string());
        let releases = json["releases"].as_array().unwrap();
        assert_eq!(releases.len(), 2);
        assert_eq!(releases[0]["name"], "Api 3.1");
        assert_eq!(releases[0]["stages"], serde_json::json!([]));

        let web = &releases[1];
        assert_eq!(web["releasePathName"], "Web");
        assert_eq!(web["targetStageId"], 20);
        assert_eq!(web["stages"][0]["environment"], "prod-west");
        assert_eq!(web["stages"][0]["rank"], 3);
        assert_eq!(web["stages"][0]["steps"][0]["id"], 300);
        assert_eq!(web["stages"][0]["steps"][0]["rank"], 2);
    }

    #[tokio::test]
    async fn test_filter_from_headers() {
        let (status, json) = send(
            app(MemoryReleaseStore::new(sample_batch())),
            Request::get("/api/releases")
                .header("includedReleasePathIds", "1")
                .header("releaseCount", "1")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let releases = json["releases"].as_array().unwrap();
        assert_eq!(releases.len(), 1);
        assert_eq!(releases[0]["name"], "Web 1.0");
    }

    #[tokio::test]
    async fn test_filter_from_query() {
        let (status, json) = send(
            app(MemoryReleaseStore::new(sample_batch())),
            Request::get("/api/releases?releaseCount=1")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["releases"][0]["name"], "Api 3.1");
        assert_eq!(json["releases"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_count_is_bad_request() {
        let (status, json) = send(
            app(MemoryReleaseStore::new(sample_batch())),
            Request::get("/api/releases")
                .header("releaseCount", "lots")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("releaseCount"));
    }

    #[tokio::test]
    async fn test_missing_environment_is_server_error() {
        let mut batch = sample_batch();
        batch.environments.clear();

        let (status, json) = send(
            app(MemoryReleaseStore::new(batch)),
            Request::get("/api/releases").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["error"].as_str().unwrap().contains("environment 5"));
    }

    struct UnreachableStore;

    #[async_trait]
    impl ReleaseStore for UnreachableStore {
        async fn fetch_batch(&self, _filter: &ReleaseFilter) -> reldash_core::Result<ReleaseBatch> {
            Err(reldash_core::DashboardError::data_unavailable("connection refused"))
        }

        async fn ping(&self) -> reldash_core::Result<()> {
            Err(reldash_core::DashboardError::data_unavailable("connection refused"))
        }
    }

    #[tokio::test]
    async fn test_health_reports_unreachable_store() {
        let response = app(UnreachableStore)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_store_failure_is_server_error_with_message() {
        let (status, json) = send(
            app(UnreachableStore),
            Request::get("/api/releases").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "connection refused");
    }

    struct PanickingStore;

    #[async_trait]
    impl ReleaseStore for PanickingStore {
        async fn fetch_batch(&self, _filter: &ReleaseFilter) -> reldash_core::Result<ReleaseBatch> {
            panic!("row decoder out of sync");
        }
    }

    #[tokio::test]
    async fn test_panic_is_opaque_server_error() {
        let (status, json) = send(
            app(PanickingStore),
            Request::get("/api/releases").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "row decoder out of sync");
    }
}
