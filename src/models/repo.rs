use chrono::{DateTime, FixedOffset};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RepoInfo {
    /// Canonical, suffix-normalized repository path used in links.
    pub slug: String,
    /// From the `gitweb.owner` config key; empty when unset.
    pub owner: String,
    /// From the `gitweb.description` config key; empty when unset.
    pub description: String,
    /// From `info/web/last-modified` inside the git directory.
    pub last_modified: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexData {
    pub repos: Vec<RepoInfo>,
}
