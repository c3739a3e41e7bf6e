//! Tree and blob DTOs.
//!
//! - `TreeData`: commit header plus directory listing (tree and head views)
//! - `TreeEntry`: single file/directory with its canonical link
//! - `BlobData`: file contents split into numbered lines

use serde::Serialize;

use super::{CommitInfo, RepoInfo};

#[derive(Debug, Clone, Serialize)]
pub struct TreeData {
    pub repo: RepoInfo,
    pub revision: String,
    pub path: String,
    /// Absent for an empty repository with no commits yet.
    pub commit: Option<CommitInfo>,
    pub entries: Vec<TreeEntry>,
    /// Contents of the preferred README file in this tree, if any.
    pub readme: Option<String>,
}

impl TreeData {
    /// Placeholder rendering for a repository without commits.
    pub fn empty(repo: RepoInfo) -> Self {
        TreeData {
            repo,
            revision: String::new(),
            path: String::new(),
            commit: None,
            entries: Vec::new(),
            readme: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TreeEntry {
    pub name: String,
    pub mode: FileMode,
    pub hash: String,
    /// Link to view the entry, in canonical `/slug/-/section/rev/path` form.
    pub href: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileMode {
    File,
    Executable,
    Dir,
    Symlink,
    Submodule,
    Empty,
}

impl FileMode {
    /// Map a raw git tree-entry mode.
    pub fn from_git(mode: i32) -> Self {
        match mode {
            0o040000 => FileMode::Dir,
            0o100644 | 0o100664 => FileMode::File,
            0o100755 => FileMode::Executable,
            0o120000 => FileMode::Symlink,
            0o160000 => FileMode::Submodule,
            _ => FileMode::Empty,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BlobData {
    pub repo: RepoInfo,
    pub revision: String,
    pub path: String,
    pub commit: CommitInfo,
    pub hash: String,
    pub size: u64,
    pub lines: Vec<BlobLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlobLine {
    pub number: usize,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_mode_mapping() {
        assert_eq!(FileMode::from_git(0o040000), FileMode::Dir);
        assert_eq!(FileMode::from_git(0o100644), FileMode::File);
        assert_eq!(FileMode::from_git(0o100664), FileMode::File);
        assert_eq!(FileMode::from_git(0o100755), FileMode::Executable);
        assert_eq!(FileMode::from_git(0o120000), FileMode::Symlink);
        assert_eq!(FileMode::from_git(0o160000), FileMode::Submodule);
        assert_eq!(FileMode::from_git(0), FileMode::Empty);
    }
}
