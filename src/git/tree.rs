use std::collections::HashMap;
use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::{BlobData, BlobLine, FileMode, TreeData, TreeEntry};

use super::repository::{GitRepository, commit_to_info};

// In preference order.
const README_NAMES: [&str; 3] = ["README", "README.md", "README.rst"];

impl GitRepository {
    /// Tree listing at `revision`/`path`: commit header, entries with
    /// canonical links, and README contents when the tree has one.
    pub fn tree_data(&self, revision: &str, path: &str) -> Result<TreeData> {
        let commit = self.find_commit(revision)?;
        let tree = commit.tree()?;
        let target = if path.is_empty() || path == "/" {
            tree
        } else {
            let entry = tree
                .get_path(Path::new(path))
                .map_err(|_| AppError::NotFound(format!("directory '{path}'")))?;
            entry
                .to_object(&self.repo)?
                .peel_to_tree()
                .map_err(|_| AppError::NotFound(format!("directory '{path}'")))?
        };

        let mut entries = Vec::with_capacity(target.len());
        let mut readmes: HashMap<String, git2::Oid> = HashMap::new();
        for entry in target.iter() {
            let name = entry.name().unwrap_or("").to_string();
            let mode = FileMode::from_git(entry.filemode());
            let section = if mode == FileMode::Dir { "tree" } else { "blob" };
            let entry_path = if path.is_empty() {
                name.clone()
            } else {
                format!("{path}/{name}")
            };
            if README_NAMES.contains(&name.as_str()) {
                readmes.insert(name.clone(), entry.id());
            }
            entries.push(TreeEntry {
                href: format!("/{}/-/{}/{}/{}", self.slug, section, revision, entry_path),
                hash: entry.id().to_string(),
                name,
                mode,
            });
        }

        let readme = README_NAMES
            .iter()
            .find_map(|name| readmes.get(*name))
            .and_then(|&oid| self.read_blob(oid).ok());

        Ok(TreeData {
            repo: self.info(),
            revision: revision.to_string(),
            path: path.to_string(),
            commit: Some(commit_to_info(&commit)),
            entries,
            readme,
        })
    }

    /// Blob contents at `revision`/`path`, split into numbered lines.
    pub fn blob_data(&self, revision: &str, path: &str) -> Result<BlobData> {
        let commit = self.find_commit(revision)?;
        let blob = self.find_blob(&commit, path)?;
        let content = String::from_utf8_lossy(blob.content());
        let lines = content
            .lines()
            .enumerate()
            .map(|(i, line)| BlobLine {
                number: i + 1,
                content: line.to_string(),
            })
            .collect();
        Ok(BlobData {
            repo: self.info(),
            revision: revision.to_string(),
            path: path.to_string(),
            commit: commit_to_info(&commit),
            hash: blob.id().to_string(),
            size: blob.size() as u64,
            lines,
        })
    }

    /// Raw blob bytes at `revision`/`path`.
    pub fn raw_data(&self, revision: &str, path: &str) -> Result<Vec<u8>> {
        let commit = self.find_commit(revision)?;
        let blob = self.find_blob(&commit, path)?;
        Ok(blob.content().to_vec())
    }

    fn find_blob(&self, commit: &git2::Commit, path: &str) -> Result<git2::Blob<'_>> {
        let entry = commit
            .tree()?
            .get_path(Path::new(path))
            .map_err(|_| AppError::NotFound(format!("file '{path}'")))?;
        let object = entry.to_object(&self.repo)?;
        object
            .into_blob()
            .map_err(|_| AppError::NotFound(format!("file '{path}'")))
    }

    fn read_blob(&self, oid: git2::Oid) -> Result<String> {
        let blob = self.repo.find_blob(oid)?;
        Ok(String::from_utf8_lossy(blob.content()).into_owned())
    }
}
