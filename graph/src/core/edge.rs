use super::branch::BranchId;
use super::node::NodeId;

/// Stable handle of an edge inside a [`Graph`](super::Graph) arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub(crate) usize);

impl EdgeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// An edge connecting a child (up) node to its parent (down) node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub(crate) up: NodeId,
    pub(crate) down: NodeId,
    pub(crate) edge_type: EdgeType,
    pub(crate) branch: BranchId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeType {
    /// Regular parent-child relationship
    Usual,
    /// Stands in for a whole collapsed fragment
    HideFragment,
}

impl Edge {
    pub(crate) fn new(up: NodeId, down: NodeId, edge_type: EdgeType, branch: BranchId) -> Self {
        Self {
            up,
            down,
            edge_type,
            branch,
        }
    }

    pub fn up(&self) -> NodeId {
        self.up
    }

    pub fn down(&self) -> NodeId {
        self.down
    }

    pub fn edge_type(&self) -> EdgeType {
        self.edge_type
    }

    pub fn branch(&self) -> BranchId {
        self.branch
    }

    pub fn is_hide_fragment(&self) -> bool {
        self.edge_type == EdgeType::HideFragment
    }
}
