use serde::Serialize;

use super::RepoInfo;

#[derive(Debug, Clone, Serialize)]
pub struct Reference {
    pub name: String,
    /// Commit or tagger time, whichever the reference carries.
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefsData {
    pub repo: RepoInfo,
    pub branches: Vec<Reference>,
    pub tags: Vec<Reference>,
}
