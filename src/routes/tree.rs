use axum::Json;

use crate::error::Result;
use crate::git::GitRepository;
use crate::models::TreeData;
use crate::request::Request;

/// Tree and head views. An empty revision means the repository has no
/// commits yet; render the placeholder rather than erroring.
pub fn tree(repo: &GitRepository, req: &Request) -> Result<Json<TreeData>> {
    if req.revision.is_empty() {
        return Ok(Json(TreeData::empty(repo.info())));
    }
    Ok(Json(repo.tree_data(&req.revision, &req.path)?))
}
