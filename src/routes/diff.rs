use axum::Json;

use crate::config::Config;
use crate::error::Result;
use crate::git::GitRepository;
use crate::models::DiffData;
use crate::request::Request;

pub fn diff(config: &Config, repo: &GitRepository, req: &Request) -> Result<Json<DiffData>> {
    Ok(Json(repo.diff_data(&req.diff_from, &req.diff_to, config.diff_context)?))
}
