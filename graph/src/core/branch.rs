use std::fmt;

/// Handle of a branch; ids grow in creation order, which drives column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BranchId(pub(crate) usize);

/// A lineage segment of the history
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Branch {
    /// Started by a head commit, shared by its single-parent ancestors
    Trunk(String),
    /// One parent edge of a merge commit
    Merge { child: String, parent: String },
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Branch::Trunk(hash) => write!(f, "{}", hash),
            Branch::Merge { child, parent } => write!(f, "{}->{}", child, parent),
        }
    }
}
