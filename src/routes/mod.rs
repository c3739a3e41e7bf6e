//! Request dispatch — one linear pipeline per inbound request.
//!
//! The URL grammar lets repository paths contain slashes, so no axum route
//! pattern can express it; everything hangs off a single fallback handler
//! that parses, resolves, recovers, and hands off to a view:
//! - `index`: repository listing (the root path)
//! - `tree`, `blob`: directory listings and file contents
//! - `refs`, `log`, `commit`, `diff`: history views
//! - `transfer`: dumb-protocol clone/fetch paths

pub mod blob;
pub mod commit;
pub mod diff;
pub mod index;
pub mod log;
pub mod refs;
pub mod transfer;
pub mod tree;

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::{Query, State},
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::get,
};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::git::GitRepository;
use crate::request::{self, RequestQuery, Section};
use crate::resolve;

pub fn create_router(config: Arc<Config>) -> Router {
    Router::new().fallback(get(dispatch)).with_state(config)
}

async fn dispatch(
    State(config): State<Arc<Config>>,
    Query(query): Query<RequestQuery>,
    uri: Uri,
) -> Result<Response> {
    let mut req = request::parse(uri.path(), &query)?;
    tracing::debug!(path = uri.path(), section = ?req.section, repo = %req.repo, "parsed request");

    if req.section == Section::Root {
        return Ok(index::index(&config)?.into_response());
    }

    let resolved = match resolve::resolve(
        &config.repo_base_path,
        &req.repo,
        config.suffix_policy,
        resolve::is_git_dir,
    ) {
        Some(resolved) => resolved,
        None => {
            if let Some(location) = resolve::recover(
                &req,
                &config.repo_base_path,
                config.suffix_policy,
                resolve::is_git_dir,
            ) {
                tracing::info!(from = uri.path(), to = %location, "redirecting");
                return moved_permanently(&location);
            }
            return Err(AppError::NotFound(format!("repository '{}'", req.repo)));
        }
    };

    tracing::debug!(matched = %resolved.path, slug = %resolved.slug, "resolved repository");

    if matches!(req.section, Section::DumbTransfer | Section::SmartTransfer) {
        return transfer::serve(&req, &resolved).await;
    }

    let repo = GitRepository::open(&resolved.dir, resolved.slug)?;
    if req.section == Section::Head {
        req.revision = repo.default_branch().unwrap_or_default();
    }

    let response = match req.section {
        Section::Head | Section::Tree => tree::tree(&repo, &req)?.into_response(),
        Section::Blob => blob::blob(&repo, &req)?.into_response(),
        Section::Raw => blob::raw(&repo, &req)?,
        Section::Refs => refs::refs(&repo)?.into_response(),
        Section::Log => log::log(&config, &repo, &req)?.into_response(),
        Section::Commit => commit::commit(&config, &repo, &req)?.into_response(),
        Section::Diff => diff::diff(&config, &repo, &req)?.into_response(),
        Section::Root | Section::DumbTransfer | Section::SmartTransfer => {
            return Err(AppError::Internal("section dispatched out of order".into()));
        }
    };
    Ok(response)
}

fn moved_permanently(location: &str) -> Result<Response> {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(header::LOCATION, location)
        .body(Body::empty())
        .map_err(|err| AppError::Internal(format!("building redirect: {err}")))
}
