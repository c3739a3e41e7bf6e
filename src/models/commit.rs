use serde::Serialize;

use super::{FilePatch, RepoInfo};

#[derive(Debug, Clone, Serialize)]
pub struct CommitInfo {
    pub hash: String,
    pub author: String,
    pub committer: String,
    /// Full message in commit and tree views; first line in log pages.
    pub message: String,
    pub timestamp: i64,
    pub parents: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogData {
    pub repo: RepoInfo,
    pub revision: String,
    pub commits: Vec<CommitInfo>,
    /// Cursor for the next page; absent on the last page.
    pub next_page: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommitData {
    pub repo: RepoInfo,
    pub revision: String,
    pub commit: CommitInfo,
    pub diffstat: String,
    pub patches: Vec<FilePatch>,
}
