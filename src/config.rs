//! Server configuration.
//!
//! One `Config` value is built from the CLI in `main` and threaded through
//! handlers as axum state; nothing reads ambient configuration.

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::resolve::SuffixPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base directory prepended to repository request paths.
    pub repo_base_path: PathBuf,
    /// Optional file listing the repository paths exposed on the index.
    pub project_list: Option<PathBuf>,
    /// Slug normalization for generated links.
    pub suffix_policy: SuffixPolicy,
    /// Unchanged lines kept on either side of a change in rendered diffs.
    pub diff_context: usize,
    /// Commits per log page.
    pub log_page_size: usize,
}

/// Read a project list file: one repository path per line, relative to the
/// base directory.
pub fn load_project_list(path: &Path) -> anyhow::Result<Vec<String>> {
    let file = std::fs::File::open(path)?;
    let mut projects = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if !line.trim().is_empty() {
            projects.push(line);
        }
    }
    Ok(projects)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_list_skips_blank_lines() {
        let tmp = tempfile::TempDir::new().unwrap();
        let list = tmp.path().join("projects");
        std::fs::write(&list, "proj.git\n\nteam/other\n").unwrap();
        let projects = load_project_list(&list).unwrap();
        assert_eq!(projects, ["proj.git", "team/other"]);
    }

    #[test]
    fn missing_project_list_is_an_error() {
        assert!(load_project_list(Path::new("/nonexistent/projects")).is_err());
    }
}
