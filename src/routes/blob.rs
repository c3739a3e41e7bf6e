use axum::{
    Json,
    body::Body,
    http::{StatusCode, header},
    response::Response,
};

use crate::error::{AppError, Result};
use crate::git::GitRepository;
use crate::models::BlobData;
use crate::request::Request;

pub fn blob(repo: &GitRepository, req: &Request) -> Result<Json<BlobData>> {
    Ok(Json(repo.blob_data(&req.revision, &req.path)?))
}

/// Raw blob bytes with a guessed content type.
pub fn raw(repo: &GitRepository, req: &Request) -> Result<Response> {
    let bytes = repo.raw_data(&req.revision, &req.path)?;
    let mime = mime_guess::from_path(&req.path).first_or_octet_stream();
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime.as_ref())
        .body(Body::from(bytes))
        .map_err(|err| AppError::Internal(format!("building raw response: {err}")))
}
