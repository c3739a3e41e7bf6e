//! Dumb-protocol transfer serving: raw repository files plus the two
//! generated listings, `info/refs` and `objects/info/packs`.

use std::path::Path;

use axum::{
    body::Body,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::error::{AppError, Result};
use crate::git::GitRepository;
use crate::request::{Request, Section};
use crate::resolve::Resolved;

pub async fn serve(req: &Request, resolved: &Resolved) -> Result<Response> {
    if req.section == Section::SmartTransfer {
        // Negotiation belongs to a smart-protocol implementation; this
        // server only speaks the dumb protocol.
        return Ok((StatusCode::FORBIDDEN, "smart HTTP transfer not supported").into_response());
    }

    match req.path.as_str() {
        "info/refs" => {
            let repo = GitRepository::open(&resolved.dir, resolved.slug.clone())?;
            let listing = repo.refs_advertisement()?;
            file_response("text/plain", listing.into_bytes())
        }
        "objects/info/packs" => file_response("text/plain", pack_listing(&resolved.dir).into_bytes()),
        "HEAD" => {
            tracing::info!(repo = %resolved.slug, "client reading HEAD (clone?)");
            let bytes = read_repo_file(resolved, "HEAD").await?;
            file_response("text/plain", bytes)
        }
        path if path.starts_with("objects/") => {
            let bytes = read_repo_file(resolved, path).await?;
            file_response("application/octet-stream", bytes)
        }
        path => Err(AppError::NotFound(format!("transfer path '{path}'"))),
    }
}

async fn read_repo_file(resolved: &Resolved, path: &str) -> Result<Vec<u8>> {
    // The grammar constrains these paths, but never follow a segment that
    // could climb out of the repository.
    if path
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(AppError::NotFound(format!("transfer path '{path}'")));
    }
    tokio::fs::read(resolved.dir.join(path))
        .await
        .map_err(|_| AppError::NotFound(format!("transfer path '{path}'")))
}

/// `objects/info/packs` body: one `P <packfile>` line per pack, then a
/// blank line.
fn pack_listing(dir: &Path) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    if let Ok(entries) = std::fs::read_dir(dir.join("objects/pack")) {
        let mut names: Vec<String> = entries
            .flatten()
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.ends_with(".pack"))
            .collect();
        names.sort();
        for name in names {
            let _ = writeln!(out, "P {name}");
        }
    }
    out.push('\n');
    out
}

fn file_response(content_type: &str, bytes: Vec<u8>) -> Result<Response> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(bytes))
        .map_err(|err| AppError::Internal(format!("building transfer response: {err}")))
}
