use super::node::NodeId;

/// A row of the graph and the nodes laid out in it, left to right
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRow {
    pub index: usize,
    pub nodes: Vec<NodeId>,
}

impl NodeRow {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            nodes: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
