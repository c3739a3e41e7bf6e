use std::path::Path;

use chrono::{DateTime, FixedOffset};
use git2::Repository;

use crate::error::{AppError, Result};
use crate::models::{CommitInfo, RepoInfo};
use crate::resolve::{self, SuffixPolicy};

const LAST_MODIFIED_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// An open repository plus the metadata shown alongside it. Created per
/// request and discarded with it.
pub struct GitRepository {
    pub repo: Repository,
    /// Canonical slug used in generated links.
    pub slug: String,
    /// From the `gitweb.owner` config key.
    pub owner: String,
    /// From the `gitweb.description` config key.
    pub description: String,
    /// From `info/web/last-modified` inside the git directory.
    pub last_modified: Option<DateTime<FixedOffset>>,
}

impl GitRepository {
    /// Open the repository at a resolved git directory.
    pub fn open(dir: &Path, slug: String) -> Result<Self> {
        let repo = Repository::open(dir)?;
        let (owner, description) = gitweb_metadata(&repo);
        let last_modified = read_last_modified(dir);
        Ok(Self {
            repo,
            slug,
            owner,
            description,
            last_modified,
        })
    }

    pub fn info(&self) -> RepoInfo {
        RepoInfo {
            slug: self.slug.clone(),
            owner: self.owner.clone(),
            description: self.description.clone(),
            last_modified: self.last_modified,
        }
    }

    /// Short name of the ref HEAD points at; `None` for an unborn HEAD.
    pub fn default_branch(&self) -> Option<String> {
        let head = self.repo.head().ok()?;
        head.shorthand().map(str::to_string)
    }

    /// Resolve a revision string (ref name or commit hash) to a commit.
    pub fn find_commit(&self, revision: &str) -> Result<git2::Commit<'_>> {
        let object = self
            .repo
            .revparse_single(revision)
            .map_err(|_| AppError::NotFound(format!("revision '{revision}'")))?;
        object
            .peel_to_commit()
            .map_err(|_| AppError::NotFound(format!("revision '{revision}'")))
    }
}

pub fn commit_to_info(commit: &git2::Commit) -> CommitInfo {
    CommitInfo {
        hash: commit.id().to_string(),
        author: commit.author().name().unwrap_or("Unknown").to_string(),
        committer: commit.committer().name().unwrap_or("Unknown").to_string(),
        message: commit.message().unwrap_or("").to_string(),
        timestamp: commit.time().seconds(),
        parents: commit.parent_ids().map(|id| id.to_string()).collect(),
    }
}

fn gitweb_metadata(repo: &Repository) -> (String, String) {
    let Ok(config) = repo.config().and_then(|mut c| c.snapshot()) else {
        return (String::new(), String::new());
    };
    let owner = config.get_string("gitweb.owner").unwrap_or_default();
    let description = config.get_string("gitweb.description").unwrap_or_default();
    (owner, description)
}

fn read_last_modified(dir: &Path) -> Option<DateTime<FixedOffset>> {
    let raw = std::fs::read_to_string(dir.join("info/web/last-modified")).ok()?;
    match DateTime::parse_from_str(raw.trim(), LAST_MODIFIED_FORMAT) {
        Ok(time) => Some(time),
        Err(err) => {
            tracing::warn!(dir = %dir.display(), error = %err, "bad last-modified timestamp");
            None
        }
    }
}

/// Collect every repository under `base`. The walk does not descend into a
/// repository once found.
pub fn scan_repositories(base: &Path, policy: SuffixPolicy) -> Vec<GitRepository> {
    let mut found = Vec::new();
    walk(base, base, policy, &mut found);
    found
}

fn walk(dir: &Path, base: &Path, policy: SuffixPolicy, found: &mut Vec<GitRepository>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(dir = %dir.display(), error = %err, "cannot read directory");
            return;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        if resolve::is_git_dir(&path) {
            if let Some(repo) = open_relative(&path, base, policy) {
                found.push(repo);
            }
        } else {
            walk(&path, base, policy, found);
        }
    }
}

/// Repositories named by a project list, skipping entries that are not
/// repositories on disk.
pub fn listed_repositories(
    base: &Path,
    projects: &[String],
    policy: SuffixPolicy,
) -> Vec<GitRepository> {
    let mut found = Vec::new();
    for project in projects {
        let dir = base.join(project);
        if resolve::is_git_dir(&dir) {
            if let Some(repo) = open_relative(&dir, base, policy) {
                found.push(repo);
            }
        }
    }
    found
}

fn open_relative(dir: &Path, base: &Path, policy: SuffixPolicy) -> Option<GitRepository> {
    let rel = dir.strip_prefix(base).ok()?.to_string_lossy().into_owned();
    let slug = resolve::canonical_slug(&rel, policy);
    match GitRepository::open(dir, slug) {
        Ok(repo) => Some(repo),
        Err(err) => {
            tracing::warn!(dir = %dir.display(), error = %err, "failed to open repository");
            None
        }
    }
}
