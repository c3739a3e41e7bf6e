pub mod diff;
pub mod history;
pub mod refs;
pub mod repository;
pub mod tree;

pub use repository::{GitRepository, listed_repositories, scan_repositories};

#[cfg(test)]
pub(crate) mod testutil {
    use std::path::Path;

    use git2::Repository;

    pub fn init_repo(dir: &Path) -> Repository {
        let repo = Repository::init(dir).unwrap();
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
        repo
    }

    /// Write `name` into the worktree and commit it on HEAD.
    pub fn commit_file(repo: &Repository, name: &str, content: &[u8], message: &str) -> git2::Oid {
        let file = repo.workdir().unwrap().join(name);
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&file, content).unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = git2::Signature::now("Test", "test@example.com").unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }
}
