/// A commit of the log as handed over by the VCS side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Unique commit ID (SHA)
    pub hash: String,
    /// Parent commit IDs, first parent first
    pub parents: Vec<String>,
}

impl Commit {
    pub fn new(hash: impl Into<String>, parents: Vec<String>) -> Self {
        Self {
            hash: hash.into(),
            parents,
        }
    }

    /// Check if this is a root commit (no parents)
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Check if this is a merge commit (multiple parents)
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}

/// Shorthand for tests and demos: `commit("a", &["b", "c"])`
pub fn commit(hash: &str, parents: &[&str]) -> Commit {
    Commit::new(hash, parents.iter().map(|p| p.to_string()).collect())
}
