use axum::Json;

use crate::config::Config;
use crate::error::Result;
use crate::git::GitRepository;
use crate::models::CommitData;
use crate::request::Request;

/// Commit view. Without an explicit revision the default branch head is
/// shown.
pub fn commit(config: &Config, repo: &GitRepository, req: &Request) -> Result<Json<CommitData>> {
    let revision = if req.revision.is_empty() {
        repo.default_branch().unwrap_or_default()
    } else {
        req.revision.clone()
    };
    Ok(Json(repo.commit_data(&revision, config.diff_context)?))
}
