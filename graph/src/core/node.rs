use super::branch::BranchId;
use super::edge::EdgeId;
use smallvec::SmallVec;
use std::fmt;

/// Edge list attached to a node. Most nodes have one or two edges per side.
pub type EdgeList = SmallVec<[EdgeId; 2]>;

/// Stable handle of a node inside a [`Graph`](super::Graph) arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// An actual commit of the log
    Commit,
    /// Placeholder that lets an edge pass through a row
    Edge,
    /// Parent outside of the known history
    EndCommit,
}

/// A node of the laid out graph
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) hash: String,
    pub(crate) branch: BranchId,
    pub(crate) row: usize,
    pub(crate) node_type: NodeType,
    pub(crate) up_edges: EdgeList,
    pub(crate) down_edges: EdgeList,
    pub(crate) visible: bool,
}

impl Node {
    pub(crate) fn new(id: NodeId, hash: String, branch: BranchId, row: usize) -> Self {
        Self {
            id,
            hash,
            branch,
            row,
            // Underdone nodes turn into commits or end commits once placed
            node_type: NodeType::EndCommit,
            up_edges: EdgeList::new(),
            down_edges: EdgeList::new(),
            visible: true,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Hash of the commit this node stands for (or leads to, for edge nodes)
    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn branch(&self) -> BranchId {
        self.branch
    }

    /// Index of the row in `all_rows` holding this node
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn up_edges(&self) -> &[EdgeId] {
        &self.up_edges
    }

    pub fn down_edges(&self) -> &[EdgeId] {
        &self.down_edges
    }

    /// False while the node sits inside a collapsed fragment
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_commit(&self) -> bool {
        self.node_type == NodeType::Commit
    }
}
