use git2::BranchType;

use crate::error::Result;
use crate::models::{Reference, RefsData};

use super::repository::GitRepository;

impl GitRepository {
    /// Branches and tags with their times, each list newest first.
    pub fn refs_data(&self) -> Result<RefsData> {
        let mut branches = Vec::new();
        for item in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = item?;
            let Some(name) = branch.name()?.map(str::to_string) else {
                continue;
            };
            let Ok(commit) = branch.get().peel_to_commit() else {
                continue;
            };
            branches.push(Reference {
                name,
                timestamp: commit.committer().when().seconds(),
            });
        }

        let mut tags = Vec::new();
        for item in self.repo.references_glob("refs/tags/*")? {
            let reference = item?;
            let Some(name) = reference.shorthand().map(str::to_string) else {
                continue;
            };
            let timestamp = match reference.peel_to_tag() {
                Ok(tag) => match tag.tagger() {
                    Some(tagger) => tagger.when().seconds(),
                    None => match reference.peel_to_commit() {
                        Ok(commit) => commit.committer().when().seconds(),
                        Err(_) => continue,
                    },
                },
                Err(_) => match reference.peel_to_commit() {
                    Ok(commit) => commit.committer().when().seconds(),
                    Err(_) => continue,
                },
            };
            tags.push(Reference { name, timestamp });
        }

        branches.sort_by_key(|r| std::cmp::Reverse(r.timestamp));
        tags.sort_by_key(|r| std::cmp::Reverse(r.timestamp));

        Ok(RefsData {
            repo: self.info(),
            branches,
            tags,
        })
    }

    /// Plain-text reference listing for the dumb transfer protocol: one
    /// `<hash>\t<refname>` line per ref, with annotated tag targets listed
    /// as peeled `^{}` entries.
    pub fn refs_advertisement(&self) -> Result<String> {
        use std::fmt::Write;

        let mut out = String::new();
        for item in self.repo.references()? {
            let reference = item?;
            let Some(name) = reference.name() else {
                continue;
            };
            if name.contains("HEAD") {
                continue;
            }
            let Some(target) = reference.target() else {
                continue;
            };
            let _ = writeln!(out, "{target}\t{name}");
            if let Ok(tag) = self.repo.find_tag(target) {
                let _ = writeln!(out, "{}\t{name}^{{}}", tag.target_id());
            }
        }
        Ok(out)
    }
}
