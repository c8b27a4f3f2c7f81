//! API Error Handling
//!
//! Unified error types and conversion for API responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use reldash_core::DashboardError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    DataUnavailable(String),
    InternalError(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::DataUnavailable(_) | ApiError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!("Rejected request: {}", msg);
                msg
            }
            ApiError::DataUnavailable(msg) => {
                tracing::error!("Data unavailable: {}", msg);
                msg
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                msg
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::InvalidFilter(msg) => ApiError::BadRequest(msg),
            DashboardError::DataUnavailable(msg) => ApiError::DataUnavailable(msg),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
