//! Release snapshot endpoint

use reldash_core::dto::Snapshot;
use reldash_core::filter::{INCLUDED_RELEASE_PATH_IDS, RELEASE_COUNT, encode_path_ids};
use std::collections::BTreeSet;

use crate::DashboardClient;
use crate::error::Result;

/// Filter criteria for a snapshot request
///
/// Unset fields are left to the server defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseQuery {
    pub release_path_ids: BTreeSet<i32>,
    pub release_count: Option<u32>,
}

impl ReleaseQuery {
    pub fn with_release_path(mut self, id: i32) -> Self {
        self.release_path_ids.insert(id);
        self
    }

    pub fn with_release_count(mut self, count: u32) -> Self {
        self.release_count = Some(count);
        self
    }

    /// Header name/value pairs carrying this query
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = Vec::new();
        if !self.release_path_ids.is_empty() {
            headers.push((
                INCLUDED_RELEASE_PATH_IDS,
                encode_path_ids(&self.release_path_ids),
            ));
        }
        if let Some(count) = self.release_count {
            headers.push((RELEASE_COUNT, count.to_string()));
        }
        headers
    }
}

impl DashboardClient {
    /// Fetch the current release snapshot
    ///
    /// # Arguments
    /// * `query` - Release path restriction and release count
    pub async fn get_releases(&self, query: &ReleaseQuery) -> Result<Snapshot> {
        let url = format!("{}/api/releases", self.base_url);
        let mut request = self.client.get(&url);
        for (name, value) in query.headers() {
            request = request.header(name, value);
        }

        tracing::debug!("Requesting release snapshot: {:?}", query);

        let response = request.send().await?;
        self.handle_response(response).await
    }
}
