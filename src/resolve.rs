//! Repository path resolution and redirect recovery.
//!
//! Both functions take the repository-existence check as a closure so the
//! decision logic stays a pure function of its inputs; the production
//! predicate is [`is_git_dir`].

use std::path::{Path, PathBuf};

use crate::request::{Request, Section};

/// Controls whether canonical slugs strip a trailing `.git`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuffixPolicy {
    /// Strip `.git` (and a `.git` directory component) from slugs.
    #[default]
    Strip,
    /// Expose repository paths exactly as they exist on disk.
    Keep,
}

/// A successfully resolved repository location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// The git directory itself.
    pub dir: PathBuf,
    /// Repository path relative to the base, as matched on disk.
    pub path: String,
    /// Canonical slug used in generated links.
    pub slug: String,
}

/// True when `path` is the base directory of a git repository, determined
/// by the presence of an `objects` directory and a `HEAD` entry.
pub fn is_git_dir(path: &Path) -> bool {
    path.join("objects").is_dir() && path.join("HEAD").exists()
}

/// Locate the repository named by `repo` under `base`, accepting every
/// common on-disk convention: the path as given, a `.git`-suffixed bare
/// directory, and the `.git` directory of a non-bare checkout. The
/// candidate order is fixed; `policy` only shapes the slug.
pub fn resolve<F>(base: &Path, repo: &str, policy: SuffixPolicy, is_repo: F) -> Option<Resolved>
where
    F: Fn(&Path) -> bool,
{
    if !is_safe_repo_path(repo) {
        return None;
    }
    let candidates = [repo.to_string(), format!("{repo}.git"), format!("{repo}/.git")];
    for candidate in candidates {
        let dir = base.join(&candidate);
        if is_repo(&dir) {
            let slug = canonical_slug(&candidate, policy);
            return Some(Resolved {
                dir,
                path: candidate,
                slug,
            });
        }
    }
    None
}

/// Slug for a repository path that matched on disk.
pub fn canonical_slug(path: &str, policy: SuffixPolicy) -> String {
    match policy {
        SuffixPolicy::Keep => path.to_string(),
        SuffixPolicy::Strip => {
            let s = path.strip_suffix(".git").unwrap_or(path);
            let s = s.strip_suffix('/').unwrap_or(s);
            s.to_string()
        }
    }
}

// Repository paths come straight off the wire; never let them climb out of
// the base directory.
fn is_safe_repo_path(repo: &str) -> bool {
    !repo.is_empty()
        && repo
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}

/// Search for a canonical URL that a failed request should have used.
/// Returns a permanent-redirect target carrying the full original request.
/// At most one corrective transformation is applied, so the target is
/// guaranteed to resolve on the client's next attempt.
pub fn recover<F>(req: &Request, base: &Path, policy: SuffixPolicy, is_repo: F) -> Option<String>
where
    F: Fn(&Path) -> bool,
{
    if req.section == Section::Head {
        if let Some(location) = recover_separator(req, base, policy, &is_repo) {
            return Some(location);
        }
    }
    recover_suffix(req, base, policy, &is_repo)
}

/// A request that parsed without a `-` separator may be a browsing URL
/// written in the pre-separator style. Scan the repository path from the
/// back for a segment matching a section keyword whose prefix resolves;
/// scanning back-to-front prefers the longest repository name.
fn recover_separator<F>(
    req: &Request,
    base: &Path,
    policy: SuffixPolicy,
    is_repo: &F,
) -> Option<String>
where
    F: Fn(&Path) -> bool,
{
    let elems: Vec<&str> = req.repo.split('/').collect();
    for i in (1..elems.len()).rev() {
        if Section::from_keyword(elems[i]).is_none() {
            continue;
        }
        let candidate = elems[..i].join("/");
        if resolve(base, &candidate, policy, is_repo).is_some() {
            return Some(format!("/{}/-/{}", candidate, elems[i..].join("/")));
        }
    }
    None
}

/// Toggle the `.git` suffix on the parsed repository path and re-test,
/// redirecting to the corrected path on a hit.
fn recover_suffix<F>(
    req: &Request,
    base: &Path,
    policy: SuffixPolicy,
    is_repo: &F,
) -> Option<String>
where
    F: Fn(&Path) -> bool,
{
    let mut candidates: Vec<String> = Vec::new();
    if let Some(stripped) = req.repo.strip_suffix(".git") {
        candidates.push(stripped.strip_suffix('/').unwrap_or(stripped).to_string());
    } else {
        candidates.push(format!("{}.git", req.repo));
        candidates.push(format!("{}/.git", req.repo));
    }
    for candidate in candidates {
        if resolve(base, &candidate, policy, is_repo).is_some() {
            let mut target = req.clone();
            target.repo = candidate;
            let mut location = target.to_path();
            if !target.from.is_empty() {
                location.push_str("?from=");
                location.push_str(&target.from);
            }
            return Some(location);
        }
    }
    None
}
