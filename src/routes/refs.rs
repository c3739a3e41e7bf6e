use axum::Json;

use crate::error::Result;
use crate::git::GitRepository;
use crate::models::RefsData;

pub fn refs(repo: &GitRepository) -> Result<Json<RefsData>> {
    Ok(Json(repo.refs_data()?))
}
