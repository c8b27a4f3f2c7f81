//! Filter resolution
//!
//! Turns caller-supplied request metadata into a validated [`ReleaseFilter`].

use std::collections::{BTreeSet, HashMap};
use std::num::NonZeroU32;

use crate::error::{DashboardError, Result};

/// Metadata field restricting releases to a set of release paths
pub const INCLUDED_RELEASE_PATH_IDS: &str = "includedReleasePathIds";

/// Metadata field capping the number of releases returned
pub const RELEASE_COUNT: &str = "releaseCount";

/// Release count used when the caller does not supply one
pub const DEFAULT_RELEASE_COUNT: NonZeroU32 = match NonZeroU32::new(5) {
    Some(count) => count,
    None => unreachable!(),
};

/// Caller-supplied filter criteria
///
/// Field names are matched case-insensitively, since they usually arrive as
/// HTTP headers.
#[derive(Debug, Clone, Default)]
pub struct RequestMetadata {
    fields: HashMap<String, String>,
}

impl RequestMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any earlier value for the same name
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.fields
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for RequestMetadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = Self::new();
        for (name, value) in iter {
            metadata.insert(name, value);
        }
        metadata
    }
}

/// Validated retrieval parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseFilter {
    /// Release paths to restrict to; `None` means no restriction
    pub release_path_ids: Option<BTreeSet<i32>>,
    /// Maximum number of releases
    pub limit: NonZeroU32,
}

impl Default for ReleaseFilter {
    fn default() -> Self {
        Self {
            release_path_ids: None,
            limit: DEFAULT_RELEASE_COUNT,
        }
    }
}

impl ReleaseFilter {
    /// Check whether a release on the given path passes the path restriction
    pub fn includes_path(&self, release_path_id: i32) -> bool {
        self.release_path_ids
            .as_ref()
            .is_none_or(|ids| ids.contains(&release_path_id))
    }
}

/// Resolve request metadata into a [`ReleaseFilter`]
pub fn resolve_filter(metadata: &RequestMetadata) -> Result<ReleaseFilter> {
    let release_path_ids = match metadata.get(INCLUDED_RELEASE_PATH_IDS) {
        Some(raw) => parse_path_ids(raw)?,
        None => None,
    };

    let limit = match metadata.get(RELEASE_COUNT) {
        Some(raw) => parse_release_count(raw)?,
        None => DEFAULT_RELEASE_COUNT,
    };

    Ok(ReleaseFilter {
        release_path_ids,
        limit,
    })
}

/// Encode a set of release path ids the way [`resolve_filter`] reads them
pub fn encode_path_ids(ids: &BTreeSet<i32>) -> String {
    ids.iter()
        .map(i32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_path_ids(raw: &str) -> Result<Option<BTreeSet<i32>>> {
    let mut ids = BTreeSet::new();
    for item in raw.split(',').map(str::trim).filter(|item| !item.is_empty()) {
        let id = item.parse::<i32>().map_err(|_| {
            DashboardError::invalid_filter(format!(
                "{INCLUDED_RELEASE_PATH_IDS} contains a non-numeric id: '{item}'"
            ))
        })?;
        ids.insert(id);
    }

    Ok(if ids.is_empty() { None } else { Some(ids) })
}

fn parse_release_count(raw: &str) -> Result<NonZeroU32> {
    raw.trim().parse::<NonZeroU32>().map_err(|_| {
        DashboardError::invalid_filter(format!(
            "{RELEASE_COUNT} must be a positive integer, got '{raw}'"
        ))
    })
}
