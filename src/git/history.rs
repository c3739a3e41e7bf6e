use git2::{Oid, Sort};

use crate::error::{AppError, Result};
use crate::models::{CommitInfo, LogData};

use super::repository::{GitRepository, commit_to_info};

impl GitRepository {
    /// One page of history in committer-time order, starting at the `from`
    /// cursor, or at `revision` when no cursor is given. The next-page
    /// cursor is the first parent of the last commit on a full page.
    pub fn log_data(&self, revision: &str, from: &str, page_size: usize) -> Result<LogData> {
        let start = if from.is_empty() {
            self.find_commit(revision)?.id()
        } else {
            Oid::from_str(from).map_err(|_| AppError::NotFound(format!("commit '{from}'")))?
        };

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;
        revwalk
            .push(start)
            .map_err(|_| AppError::NotFound(format!("commit '{start}'")))?;

        let mut commits: Vec<CommitInfo> = Vec::with_capacity(page_size);
        for oid in revwalk.take(page_size) {
            let commit = self.repo.find_commit(oid?)?;
            let mut info = commit_to_info(&commit);
            info.message = info.message.lines().next().unwrap_or("").to_string();
            commits.push(info);
        }

        let next_page = match commits.last() {
            Some(last) if commits.len() == page_size => last.parents.first().cloned(),
            _ => None,
        };

        Ok(LogData {
            repo: self.info(),
            revision: revision.to_string(),
            commits,
            next_page,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::error::AppError;
    use crate::git::GitRepository;
    use crate::git::testutil::{commit_file, init_repo};

    fn setup() -> (tempfile::TempDir, GitRepository, Vec<git2::Oid>) {
        let tmp = tempfile::TempDir::new().unwrap();
        let repo = init_repo(tmp.path());
        let commits = vec![
            commit_file(&repo, "a.txt", b"one\n", "first\n\nbody"),
            commit_file(&repo, "a.txt", b"two\n", "second"),
            commit_file(&repo, "a.txt", b"three\n", "third"),
        ];
        let opened = GitRepository::open(&tmp.path().join(".git"), "proj".into()).unwrap();
        (tmp, opened, commits)
    }

    #[test]
    fn log_pages_through_history() {
        let (_tmp, repo, commits) = setup();

        let page = repo.log_data("HEAD", "", 2).unwrap();
        assert_eq!(page.commits.len(), 2);
        assert_eq!(page.commits[0].hash, commits[2].to_string());
        assert_eq!(page.commits[0].message, "third");
        // A full page points at the first parent of its last commit.
        assert_eq!(page.next_page.as_deref(), Some(commits[0].to_string().as_str()));

        let cursor = page.next_page.unwrap();
        let last = repo.log_data("HEAD", &cursor, 2).unwrap();
        assert_eq!(last.commits.len(), 1);
        assert_eq!(last.commits[0].hash, commits[0].to_string());
        assert!(last.next_page.is_none());
    }

    #[test]
    fn log_truncates_messages_to_first_line() {
        let (_tmp, repo, _) = setup();
        let page = repo.log_data("HEAD", "", 20).unwrap();
        assert_eq!(page.commits.last().unwrap().message, "first");
    }

    #[test]
    fn log_with_bad_cursor_is_not_found() {
        let (_tmp, repo, _) = setup();
        let err = repo.log_data("HEAD", "not-a-hash", 20).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
