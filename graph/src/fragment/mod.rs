pub mod generator;
pub mod manager;

pub use generator::FragmentGenerator;
pub use manager::FragmentManager;

use crate::core::NodeId;
use std::collections::BTreeSet;

/// Single-entry / single-exit region between two commit nodes.
///
/// Every path leaving `up` goes through `intermediate` nodes only and meets
/// again at `down`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub(crate) up: NodeId,
    pub(crate) down: NodeId,
    pub(crate) intermediate: BTreeSet<NodeId>,
}

impl Fragment {
    pub fn up(&self) -> NodeId {
        self.up
    }

    pub fn down(&self) -> NodeId {
        self.down
    }

    pub fn intermediate(&self) -> &BTreeSet<NodeId> {
        &self.intermediate
    }

    /// Nothing lies between the boundaries; hiding it would change nothing
    pub fn is_trivial(&self) -> bool {
        self.intermediate.is_empty()
    }
}
