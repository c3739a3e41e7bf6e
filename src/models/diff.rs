//! Diff DTOs.
//!
//! `PatchRow` comes from the render pipeline in [`crate::patch`]; these
//! types wrap it per file and per comparison.

use serde::Serialize;

use super::RepoInfo;
use crate::patch::PatchRow;

#[derive(Debug, Clone, Serialize)]
pub struct FilePatch {
    /// Display name: the path, annotated for creations, deletions, and
    /// renames.
    pub file: String,
    pub is_binary: bool,
    pub rows: Vec<PatchRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiffData {
    pub repo: RepoInfo,
    pub from: String,
    pub to: String,
    pub diffstat: String,
    pub patches: Vec<FilePatch>,
}
