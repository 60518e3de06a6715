use anyhow::{Context, Result};
use git2::{BranchType, Repository, Sort};
use graph::Commit;
use std::path::Path;
use tracing::debug;

/// Reads commit history out of a git repository, newest first
pub struct GitWalker {
    repo: Repository,
}

impl GitWalker {
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)
            .with_context(|| format!("Failed to open repository at {}", path.display()))?;
        Ok(Self { repo })
    }

    /// Commits reachable from HEAD and every local branch, children before
    /// parents
    pub fn commits(&self, limit: Option<usize>) -> Result<Vec<Commit>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;

        // unborn HEAD in a fresh repository
        if let Ok(head) = self.repo.head() {
            if let Some(target) = head.target() {
                revwalk.push(target)?;
            }
        }
        for branch in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = branch?;
            if let Some(target) = branch.get().target() {
                revwalk.push(target)?;
            }
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            if limit.map_or(false, |limit| commits.len() >= limit) {
                break;
            }
            let commit = self.repo.find_commit(oid?)?;
            commits.push(Commit::new(
                commit.id().to_string(),
                commit.parent_ids().map(|oid| oid.to_string()).collect(),
            ));
        }
        debug!(count = commits.len(), "walked commits");
        Ok(commits)
    }

    /// `(branch name, target hash)` for every local branch
    pub fn branch_heads(&self) -> Result<Vec<(String, String)>> {
        let mut heads = Vec::new();
        for branch in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = branch?;
            let Some(name) = branch.name()? else {
                continue;
            };
            if let Some(target) = branch.get().target() {
                heads.push((name.to_string(), target.to_string()));
            }
        }
        heads.sort();
        Ok(heads)
    }
}
