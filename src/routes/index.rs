use axum::Json;

use crate::config::{self, Config};
use crate::error::{AppError, Result};
use crate::git::{self, GitRepository};
use crate::models::IndexData;

/// Repository index, newest activity first. With a project list the index
/// is restricted to the listed paths; otherwise the base path is scanned.
pub fn index(config: &Config) -> Result<Json<IndexData>> {
    let mut repos: Vec<GitRepository> = match &config.project_list {
        Some(list) => {
            let projects = config::load_project_list(list)
                .map_err(|err| AppError::Internal(format!("reading project list: {err}")))?;
            if projects.is_empty() {
                tracing::warn!("project list is empty");
            }
            git::listed_repositories(&config.repo_base_path, &projects, config.suffix_policy)
        }
        None => git::scan_repositories(&config.repo_base_path, config.suffix_policy),
    };
    if repos.is_empty() {
        tracing::warn!("no repositories found");
    }

    repos.sort_by_key(|repo| {
        std::cmp::Reverse(repo.last_modified.map(|t| t.timestamp()).unwrap_or(i64::MIN))
    });

    Ok(Json(IndexData {
        repos: repos.iter().map(GitRepository::info).collect(),
    }))
}
