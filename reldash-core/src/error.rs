//! Error taxonomy for dashboard requests

use thiserror::Error;

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Errors a dashboard request can end in
///
/// There is no partial result: a request either yields a complete snapshot
/// or one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    /// Caller-supplied filter input could not be understood
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// The store could not deliver a complete, consistent batch
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),
}

impl DashboardError {
    pub fn invalid_filter(message: impl Into<String>) -> Self {
        Self::InvalidFilter(message.into())
    }

    pub fn data_unavailable(message: impl Into<String>) -> Self {
        Self::DataUnavailable(message.into())
    }

    /// Check if the caller can fix this by resubmitting corrected input
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidFilter(_))
    }
}
