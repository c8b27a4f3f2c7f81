//! Release API Handlers
//!
//! HTTP endpoint serving the dashboard snapshot.

use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
};
use reldash_core::dto::Snapshot;
use reldash_core::filter::{INCLUDED_RELEASE_PATH_IDS, RELEASE_COUNT, RequestMetadata};
use std::collections::HashMap;

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};
use crate::service::release_service;

/// GET /api/releases
/// Current state of the most recent releases
///
/// Filter fields are read from query parameters and from request headers of
/// the same name; a header overrides a query parameter.
pub async fn get_releases(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> ApiResult<Json<Snapshot>> {
    let metadata = request_metadata(&params, &headers)?;

    let snapshot =
        release_service::get_snapshot(state.store.as_ref(), &metadata, state.fetch_timeout)
            .await?;

    Ok(Json(snapshot))
}

fn request_metadata(
    params: &HashMap<String, String>,
    headers: &HeaderMap,
) -> ApiResult<RequestMetadata> {
    let mut metadata = RequestMetadata::new();

    for (name, value) in params {
        metadata.insert(name, value.clone());
    }

    for name in [INCLUDED_RELEASE_PATH_IDS, RELEASE_COUNT] {
        if let Some(value) = headers.get(name) {
            let value = value.to_str().map_err(|_| {
                ApiError::BadRequest(format!("Header {} is not valid text", name))
            })?;
            metadata.insert(name, value);
        }
    }

    Ok(metadata)
}
