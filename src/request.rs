//! Inbound URL parsing.
//!
//! Two grammars are tried in order. Transfer requests (clone/fetch paths)
//! are parsed first because their grammar is stricter: a trailing `HEAD` or
//! `info/refs` must win against a reading of the same segments as elements
//! of a repository path.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RequestError {
    #[error("malformed request: {0}")]
    Malformed(String),

    #[error("unknown section: {0}")]
    UnknownSection(String),
}

/// The view a request addresses.
///
/// `Root`, `Head`, and the two transfer variants are never written as path
/// keywords; the rest appear literally after the `/-/` separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Root,
    Head,
    Tree,
    Blob,
    Raw,
    Refs,
    Log,
    Commit,
    Diff,
    DumbTransfer,
    SmartTransfer,
}

impl Section {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "head" => Some(Section::Head),
            "tree" => Some(Section::Tree),
            "blob" => Some(Section::Blob),
            "raw" => Some(Section::Raw),
            "refs" => Some(Section::Refs),
            "log" => Some(Section::Log),
            "commit" => Some(Section::Commit),
            "diff" => Some(Section::Diff),
            _ => None,
        }
    }

    /// Path keyword for browsing sections; empty for the sections that are
    /// never spelled out in a URL.
    pub fn keyword(&self) -> &'static str {
        match self {
            Section::Head => "head",
            Section::Tree => "tree",
            Section::Blob => "blob",
            Section::Raw => "raw",
            Section::Refs => "refs",
            Section::Log => "log",
            Section::Commit => "commit",
            Section::Diff => "diff",
            Section::Root | Section::DumbTransfer | Section::SmartTransfer => "",
        }
    }
}

/// Query parameters consumed by the parser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestQuery {
    /// Smart-transfer negotiation marker (`service=git-upload-pack`).
    pub service: Option<String>,
    /// Log pagination cursor; only legal on the log view.
    pub from: Option<String>,
}

/// A parsed request. Constructed once per inbound request; immutable
/// afterwards except that the head view fills in an empty `revision` with
/// the default branch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    /// Repository path relative to the base directory. May contain slashes.
    pub repo: String,
    pub section: Section,
    /// Revision (ref name or commit hash); empty means the default branch.
    pub revision: String,
    /// Path within the repository tree, or the transfer sub-path.
    pub path: String,
    /// Diff endpoints; populated only when `section` is `Diff`.
    pub diff_from: String,
    pub diff_to: String,
    /// Log pagination cursor; populated only when `section` is `Log`.
    pub from: String,
}

impl Request {
    /// Canonical URL path for this request. Parsing the result yields an
    /// identical request, which is what makes single-hop redirects safe.
    pub fn to_path(&self) -> String {
        match self.section {
            Section::Root => "/".to_string(),
            Section::Head => format!("/{}", self.repo),
            Section::DumbTransfer | Section::SmartTransfer => {
                format!("/{}/{}", self.repo, self.path)
            }
            Section::Diff => {
                let mut p = format!("/{}/-/diff/{}..{}", self.repo, self.diff_from, self.diff_to);
                if !self.path.is_empty() {
                    p.push('/');
                    p.push_str(&self.path);
                }
                p
            }
            _ => {
                let mut p = format!("/{}/-/{}", self.repo, self.section.keyword());
                if !self.revision.is_empty() {
                    p.push('/');
                    p.push_str(&self.revision);
                    if !self.path.is_empty() {
                        p.push('/');
                        p.push_str(&self.path);
                    }
                }
                p
            }
        }
    }
}

pub fn parse(path: &str, query: &RequestQuery) -> Result<Request, RequestError> {
    if let Some(req) = parse_transfer(path, query) {
        return Ok(req);
    }
    parse_browse(path, query)
}

static OBJECT_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^objects/[0-9a-f]{2}/[0-9a-f]{38}$").unwrap());
static PACK_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^objects/pack/pack-[0-9a-f]{40}\.(pack|idx)$").unwrap());

/// Transfer grammar: accumulate segments into a repository path until the
/// remaining segments form one of the transfer tails. Fails (falls through
/// to the browsing grammar) when the path exhausts without a match.
fn parse_transfer(path: &str, query: &RequestQuery) -> Option<Request> {
    let segments = split_path(path);
    if segments.len() < 2 {
        return None;
    }

    let mut repo: Vec<&str> = Vec::new();
    let mut rest: &[&str] = &segments;
    while rest.len() > 1 {
        if !rest[0].is_empty() {
            repo.push(rest[0]);
        }
        rest = &rest[1..];

        let matched = match rest.len() {
            1 => rest[0] == "HEAD" || rest[0] == "git-upload-pack",
            2 => rest[0] == "info" && rest[1] == "refs",
            3 => {
                (rest[0] == "objects" && rest[1] == "info")
                    || OBJECT_PATH.is_match(&rest.join("/"))
                    || PACK_PATH.is_match(&rest.join("/"))
            }
            _ => false,
        };
        if matched {
            let sub = rest.join("/");
            let smart = sub == "git-upload-pack"
                || (sub == "info/refs" && query.service.as_deref() == Some("git-upload-pack"));
            return Some(Request {
                repo: repo.join("/"),
                section: if smart {
                    Section::SmartTransfer
                } else {
                    Section::DumbTransfer
                },
                path: sub,
                ..Default::default()
            });
        }
    }
    None
}

/// Browsing grammar: everything up to a literal `-` segment is the
/// repository path (the separator is the only unambiguous boundary, since
/// repository paths may contain slashes).
fn parse_browse(path: &str, query: &RequestQuery) -> Result<Request, RequestError> {
    let segments = split_path(path);
    let Some((first, rest)) = segments.split_first() else {
        return Ok(Request {
            section: Section::Root,
            ..Default::default()
        });
    };

    let mut repo: Vec<&str> = vec![first];
    let mut tail: &[&str] = &[];
    for (i, segment) in rest.iter().enumerate() {
        if *segment == "-" {
            tail = &rest[i + 1..];
            break;
        }
        if !segment.is_empty() {
            repo.push(segment);
        }
    }
    let repo = repo.join("/");

    let Some((keyword, tail)) = tail.split_first() else {
        return Ok(Request {
            repo,
            section: Section::Head,
            ..Default::default()
        });
    };

    let section = Section::from_keyword(keyword)
        .ok_or_else(|| RequestError::UnknownSection(keyword.to_string()))?;
    let revision = tail.first().copied().unwrap_or("").to_string();
    let path = if tail.len() > 1 { tail[1..].join("/") } else { String::new() };

    let mut req = Request {
        repo,
        section,
        revision,
        path,
        ..Default::default()
    };

    if section == Section::Diff {
        let ids: Vec<&str> = req.revision.split("..").collect();
        if ids.len() != 2 || ids[0].is_empty() || ids[1].is_empty() {
            return Err(RequestError::Malformed(format!(
                "bad commit range: {}",
                req.revision
            )));
        }
        req.diff_from = ids[0].to_string();
        req.diff_to = ids[1].to_string();
        req.revision = String::new();
        return Ok(req);
    }

    if let Some(from) = query.from.as_deref() {
        if !from.is_empty() {
            if section != Section::Log {
                return Err(RequestError::Malformed(
                    "'from' in query outside 'log'".to_string(),
                ));
            }
            req.from = from.to_string();
        }
    }

    if section == Section::Refs && !req.revision.is_empty() {
        return Err(RequestError::Malformed(format!(
            "revision specified with '{keyword}'"
        )));
    }
    if matches!(section, Section::Refs | Section::Log | Section::Commit) && !req.path.is_empty() {
        return Err(RequestError::Malformed(format!(
            "path specified with '{keyword}'"
        )));
    }

    Ok(req)
}

fn split_path(path: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = path.split('/').collect();
    while segments.first() == Some(&"") {
        segments.remove(0);
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(path: &str) -> Request {
        parse(path, &RequestQuery::default()).expect("request should parse")
    }

    #[test]
    fn browse_table() {
        let table = [
            (
                "/testRepo",
                Request {
                    repo: "testRepo".into(),
                    section: Section::Head,
                    ..Default::default()
                },
            ),
            (
                "/testSection/testRepo",
                Request {
                    repo: "testSection/testRepo".into(),
                    section: Section::Head,
                    ..Default::default()
                },
            ),
            (
                "/testRepo/-/tree/master",
                Request {
                    repo: "testRepo".into(),
                    section: Section::Tree,
                    revision: "master".into(),
                    ..Default::default()
                },
            ),
            (
                "/testRepo/-/tree/master/test/path",
                Request {
                    repo: "testRepo".into(),
                    section: Section::Tree,
                    revision: "master".into(),
                    path: "test/path".into(),
                    ..Default::default()
                },
            ),
            (
                "/testRepo/-/refs",
                Request {
                    repo: "testRepo".into(),
                    section: Section::Refs,
                    ..Default::default()
                },
            ),
            (
                "/testRepo/-/diff/v1.0.0..v1.1.0",
                Request {
                    repo: "testRepo".into(),
                    section: Section::Diff,
                    diff_from: "v1.0.0".into(),
                    diff_to: "v1.1.0".into(),
                    ..Default::default()
                },
            ),
            (
                "/a/b/proj/-/diff/v1.0..v1.1",
                Request {
                    repo: "a/b/proj".into(),
                    section: Section::Diff,
                    diff_from: "v1.0".into(),
                    diff_to: "v1.1".into(),
                    ..Default::default()
                },
            ),
        ];
        for (path, expected) in table {
            assert_eq!(parse_ok(path), expected, "path {path}");
        }
    }

    #[test]
    fn root() {
        assert_eq!(parse_ok("/").section, Section::Root);
        assert_eq!(parse_ok("").section, Section::Root);
    }

    #[test]
    fn trailing_slash_ignored_in_repo() {
        let req = parse_ok("/testRepo/");
        assert_eq!(req.repo, "testRepo");
        assert_eq!(req.section, Section::Head);
    }

    #[test]
    fn dash_without_section_is_head() {
        let req = parse_ok("/testRepo/-");
        assert_eq!(req.repo, "testRepo");
        assert_eq!(req.section, Section::Head);
    }

    #[test]
    fn unknown_section() {
        let err = parse("/testRepo/-/bogus", &RequestQuery::default()).unwrap_err();
        assert_eq!(err, RequestError::UnknownSection("bogus".into()));
    }

    #[test]
    fn refs_with_revision_is_malformed() {
        let err = parse("/testRepo/-/refs/bad", &RequestQuery::default()).unwrap_err();
        assert!(matches!(err, RequestError::Malformed(_)));
    }

    #[test]
    fn log_with_path_is_malformed() {
        let err = parse("/testRepo/-/log/main/bad", &RequestQuery::default()).unwrap_err();
        assert!(matches!(err, RequestError::Malformed(_)));
    }

    #[test]
    fn commit_with_path_is_malformed() {
        let err = parse("/testRepo/-/commit/abc123/bad", &RequestQuery::default()).unwrap_err();
        assert!(matches!(err, RequestError::Malformed(_)));
    }

    #[test]
    fn bad_diff_ranges() {
        for path in [
            "/r/-/diff/v1.0",
            "/r/-/diff/v1.0..",
            "/r/-/diff/..v1.1",
            "/r/-/diff/a..b..c",
        ] {
            let err = parse(path, &RequestQuery::default()).unwrap_err();
            assert!(matches!(err, RequestError::Malformed(_)), "path {path}");
        }
    }

    #[test]
    fn from_cursor_only_on_log() {
        let query = RequestQuery {
            from: Some("abc123".into()),
            ..Default::default()
        };
        let req = parse("/r/-/log/main", &query).unwrap();
        assert_eq!(req.from, "abc123");

        let err = parse("/r/-/tree/main", &query).unwrap_err();
        assert!(matches!(err, RequestError::Malformed(_)));
    }

    #[test]
    fn transfer_head() {
        let req = parse_ok("/proj/HEAD");
        assert_eq!(req.section, Section::DumbTransfer);
        assert_eq!(req.repo, "proj");
        assert_eq!(req.path, "HEAD");
    }

    #[test]
    fn transfer_loose_object() {
        let path = format!("/proj/objects/ab/{}", "c".repeat(38));
        let req = parse_ok(&path);
        assert_eq!(req.section, Section::DumbTransfer);
        assert_eq!(req.repo, "proj");
        assert_eq!(req.path, format!("objects/ab/{}", "c".repeat(38)));
    }

    #[test]
    fn transfer_pack() {
        let path = format!("/a/proj/objects/pack/pack-{}.idx", "0".repeat(40));
        let req = parse_ok(&path);
        assert_eq!(req.section, Section::DumbTransfer);
        assert_eq!(req.repo, "a/proj");
    }

    #[test]
    fn transfer_objects_info() {
        let req = parse_ok("/proj/objects/info/packs");
        assert_eq!(req.section, Section::DumbTransfer);
        assert_eq!(req.path, "objects/info/packs");
    }

    #[test]
    fn non_hex_object_is_not_transfer() {
        // 2+38 split but not hex: reads as a browsing request instead.
        let req = parse_ok(&format!("/proj/objects/zz/{}", "z".repeat(38)));
        assert_eq!(req.section, Section::Head);
    }

    #[test]
    fn smart_transfer_classification() {
        let query = RequestQuery {
            service: Some("git-upload-pack".into()),
            ..Default::default()
        };
        let req = parse("/proj/info/refs", &query).unwrap();
        assert_eq!(req.section, Section::SmartTransfer);

        // Without the service marker the same path is a dumb request.
        let req = parse_ok("/proj/info/refs");
        assert_eq!(req.section, Section::DumbTransfer);

        let req = parse_ok("/proj/git-upload-pack");
        assert_eq!(req.section, Section::SmartTransfer);
        assert_eq!(req.path, "git-upload-pack");
    }

    #[test]
    fn section_keyword_without_dash_is_repo_path() {
        // "tree" here is just a path segment; only `-` separates sections.
        let req = parse_ok("/proj/tree/main");
        assert_eq!(req.repo, "proj/tree/main");
        assert_eq!(req.section, Section::Head);
    }

    #[test]
    fn round_trip_identity() {
        let paths = [
            "/proj",
            "/a/b/proj",
            "/proj/-/tree/main/src",
            "/proj/-/blob/v1.2/src/lib.rs",
            "/proj/-/refs",
            "/proj/-/log/main",
            "/proj/-/commit/abc123",
            "/a/b/proj/-/diff/v1.0..v1.1",
            "/proj/HEAD",
            "/proj/info/refs",
        ];
        for path in paths {
            let req = parse_ok(path);
            let reparsed = parse(&req.to_path(), &RequestQuery::default()).unwrap();
            assert_eq!(req, reparsed, "path {path}");
        }
    }
}
