use axum::Json;

use crate::config::Config;
use crate::error::Result;
use crate::git::GitRepository;
use crate::models::LogData;
use crate::request::Request;

/// Log view. Without an explicit revision the default branch is used.
pub fn log(config: &Config, repo: &GitRepository, req: &Request) -> Result<Json<LogData>> {
    let revision = if req.revision.is_empty() {
        repo.default_branch().unwrap_or_default()
    } else {
        req.revision.clone()
    };
    Ok(Json(repo.log_data(&revision, &req.from, config.log_page_size)?))
}
