use git2::{Delta, DiffOptions, Patch};

use crate::error::Result;
use crate::models::{CommitData, DiffData, FilePatch};
use crate::patch::{self, Chunk, ChunkOp};

use super::repository::{GitRepository, commit_to_info};

// Large enough that every file patch arrives as whole-file spans;
// windowing happens at render time.
const WHOLE_FILE_CONTEXT: u32 = 0x3fff_ffff;

impl GitRepository {
    /// Commit view: metadata plus the changes against the first parent,
    /// or against the empty tree for a root commit.
    pub fn commit_data(&self, revision: &str, context_lines: usize) -> Result<CommitData> {
        let commit = self.find_commit(revision)?;
        let parent = match commit.parent_count() {
            0 => None,
            _ => Some(commit.parent(0)?),
        };
        let (diffstat, patches) = self.changes(parent.as_ref(), &commit, context_lines)?;
        Ok(CommitData {
            repo: self.info(),
            revision: revision.to_string(),
            commit: commit_to_info(&commit),
            diffstat,
            patches,
        })
    }

    /// Diff view between two revisions.
    pub fn diff_data(&self, from: &str, to: &str, context_lines: usize) -> Result<DiffData> {
        let from_commit = self.find_commit(from)?;
        let to_commit = self.find_commit(to)?;
        let (diffstat, patches) = self.changes(Some(&from_commit), &to_commit, context_lines)?;
        Ok(DiffData {
            repo: self.info(),
            from: from.to_string(),
            to: to.to_string(),
            diffstat,
            patches,
        })
    }

    fn changes(
        &self,
        from: Option<&git2::Commit>,
        to: &git2::Commit,
        context_lines: usize,
    ) -> Result<(String, Vec<FilePatch>)> {
        let from_tree = from.map(|c| c.tree()).transpose()?;
        let to_tree = to.tree()?;
        let mut opts = DiffOptions::new();
        opts.context_lines(WHOLE_FILE_CONTEXT);
        let diff =
            self.repo
                .diff_tree_to_tree(from_tree.as_ref(), Some(&to_tree), Some(&mut opts))?;

        let stats = diff.stats()?;
        let diffstat = stats
            .to_buf(git2::DiffStatsFormat::FULL, 80)?
            .as_str()
            .unwrap_or("")
            .to_string();

        let mut patches = Vec::new();
        for (idx, delta) in diff.deltas().enumerate() {
            let old_path = delta
                .old_file()
                .path()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default();
            let new_path = delta
                .new_file()
                .path()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default();
            let file = match delta.status() {
                Delta::Added => format!("{new_path} (created)"),
                Delta::Deleted => format!("{old_path} (deleted)"),
                _ if old_path == new_path => new_path,
                _ => format!("{old_path} --> {new_path}"),
            };
            // Generating the patch loads file content, which is also what
            // settles the delta's binary flag.
            let file_patch = Patch::from_diff(&diff, idx)?;
            let is_binary = match &file_patch {
                Some(file_patch) => file_patch.delta().flags().is_binary(),
                None => delta.flags().is_binary(),
            };
            let chunks = match &file_patch {
                Some(file_patch) if !is_binary => file_chunks(file_patch)?,
                _ => Vec::new(),
            };
            patches.push(FilePatch {
                file,
                is_binary,
                rows: patch::render(&chunks, is_binary, context_lines),
            });
        }
        Ok((diffstat, patches))
    }
}

/// Change spans for one file of a diff, grouped into maximal
/// same-operation chunks.
fn file_chunks(patch: &Patch) -> Result<Vec<Chunk>> {
    let mut chunks: Vec<Chunk> = Vec::new();
    for hunk_idx in 0..patch.num_hunks() {
        for line_idx in 0..patch.num_lines_in_hunk(hunk_idx)? {
            let line = patch.line_in_hunk(hunk_idx, line_idx)?;
            let op = match line.origin() {
                ' ' => ChunkOp::Equal,
                '+' => ChunkOp::Add,
                '-' => ChunkOp::Delete,
                _ => continue,
            };
            let text = String::from_utf8_lossy(line.content());
            match chunks.last_mut() {
                Some(chunk) if chunk.op == op => chunk.content.push_str(&text),
                _ => chunks.push(Chunk {
                    op,
                    content: text.into_owned(),
                }),
            }
        }
    }
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use crate::error::AppError;
    use crate::git::GitRepository;
    use crate::git::testutil::{commit_file, init_repo};
    use crate::patch::RowKind;

    fn setup() -> (tempfile::TempDir, GitRepository, git2::Oid, git2::Oid) {
        let tmp = tempfile::TempDir::new().unwrap();
        let repo = init_repo(tmp.path());
        let first = commit_file(
            &repo,
            "file.txt",
            b"l1\nl2\nl3\nl4\nl5\nl6\nl7\nl8\nl9\nl10\n",
            "first",
        );
        let second = commit_file(
            &repo,
            "file.txt",
            b"l1\nl2\nl3\nl4\nchanged\nl6\nl7\nl8\nl9\nl10\n",
            "second",
        );
        let opened = GitRepository::open(&tmp.path().join(".git"), "proj".into()).unwrap();
        (tmp, opened, first, second)
    }

    #[test]
    fn diff_windows_changes_with_context() {
        let (_tmp, repo, first, second) = setup();
        let data = repo
            .diff_data(&first.to_string(), &second.to_string(), 2)
            .unwrap();

        assert_eq!(data.patches.len(), 1);
        let patch = &data.patches[0];
        assert_eq!(patch.file, "file.txt");
        assert!(!patch.is_binary);
        assert!(!data.diffstat.is_empty());

        let rows = &patch.rows;
        assert_eq!(rows[0].kind, RowKind::Ellipsis);
        assert_eq!(rows[1].left, Some(3));

        let delete = rows.iter().find(|r| r.kind == RowKind::Delete).unwrap();
        assert_eq!(delete.left, Some(5));
        assert_eq!(delete.right, None);
        assert_eq!(delete.content, "-l5");

        let add = rows.iter().find(|r| r.kind == RowKind::Add).unwrap();
        assert_eq!(add.right, Some(5));
        assert_eq!(add.left, None);
        assert_eq!(add.content, "+changed");

        // Lines 8-10 drop without a trailing ellipsis.
        assert_ne!(rows.last().unwrap().kind, RowKind::Ellipsis);
    }

    #[test]
    fn root_commit_diffs_against_empty_tree() {
        let (_tmp, repo, first, _) = setup();
        let data = repo.commit_data(&first.to_string(), 3).unwrap();

        assert!(data.commit.parents.is_empty());
        assert_eq!(data.patches.len(), 1);
        assert_eq!(data.patches[0].file, "file.txt (created)");
        assert!(
            data.patches[0]
                .rows
                .iter()
                .all(|r| r.kind == RowKind::Add)
        );
        assert_eq!(data.patches[0].rows.len(), 10);
    }

    #[test]
    fn commit_view_diffs_against_first_parent() {
        let (_tmp, repo, _, second) = setup();
        let data = repo.commit_data(&second.to_string(), 2).unwrap();
        assert_eq!(data.commit.parents.len(), 1);
        assert_eq!(data.commit.message, "second");
        assert_eq!(data.patches.len(), 1);
        assert!(
            data.patches[0]
                .rows
                .iter()
                .any(|r| r.kind == RowKind::Delete)
        );
    }

    #[test]
    fn binary_file_renders_single_marker() {
        let tmp = tempfile::TempDir::new().unwrap();
        let repo = init_repo(tmp.path());
        let oid = commit_file(&repo, "blob.bin", b"\x00\x01\x02\x03binary", "binary");
        let opened = GitRepository::open(&tmp.path().join(".git"), "proj".into()).unwrap();

        let data = opened.commit_data(&oid.to_string(), 3).unwrap();
        assert_eq!(data.patches.len(), 1);
        assert!(data.patches[0].is_binary);
        assert_eq!(data.patches[0].rows.len(), 1);
        assert_eq!(data.patches[0].rows[0].kind, RowKind::Binary);
    }

    #[test]
    fn diff_with_unknown_revision_is_not_found() {
        let (_tmp, repo, first, _) = setup();
        let err = repo
            .diff_data(&first.to_string(), "does-not-exist", 3)
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
