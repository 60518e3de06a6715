use super::{DefaultDecorator, GraphDecorator};
use crate::core::{EdgeList, Graph, NodeId, NodeRow};
use smallvec::SmallVec;

/// Read interface of a graph as seen through a decorator
pub struct GraphView<'a, D: GraphDecorator> {
    graph: &'a Graph,
    decorator: D,
}

impl Graph {
    /// Undecorated view: only node visibility flags apply
    pub fn view(&self) -> GraphView<'_, DefaultDecorator> {
        GraphView::new(self, DefaultDecorator)
    }
}

impl<'a, D: GraphDecorator> GraphView<'a, D> {
    pub fn new(graph: &'a Graph, decorator: D) -> Self {
        Self { graph, decorator }
    }

    pub fn graph(&self) -> &'a Graph {
        self.graph
    }

    pub fn is_visible_node(&self, node: NodeId) -> bool {
        self.decorator.is_visible_node(self.graph, node)
    }

    pub fn down_edges(&self, node: NodeId) -> EdgeList {
        self.decorator.down_edges(self.graph, node)
    }

    pub fn up_edges(&self, node: NodeId) -> EdgeList {
        self.decorator.up_edges(self.graph, node)
    }

    pub fn down_nodes(&self, node: NodeId) -> SmallVec<[NodeId; 2]> {
        self.down_edges(node)
            .iter()
            .map(|&e| self.graph.edge(e).down())
            .collect()
    }

    pub fn up_nodes(&self, node: NodeId) -> SmallVec<[NodeId; 2]> {
        self.up_edges(node)
            .iter()
            .map(|&e| self.graph.edge(e).up())
            .collect()
    }

    /// Visible rows, reindexed from 0; rows without visible nodes are dropped
    pub fn node_rows(&self) -> Vec<NodeRow> {
        self.graph
            .all_rows()
            .iter()
            .filter_map(|row| {
                let nodes: Vec<NodeId> = row
                    .nodes
                    .iter()
                    .copied()
                    .filter(|&id| self.is_visible_node(id))
                    .collect();
                (!nodes.is_empty()).then_some(nodes)
            })
            .enumerate()
            .map(|(index, nodes)| NodeRow { index, nodes })
            .collect()
    }

    /// Commit node shown in visible row `index`
    pub fn commit_node_in_row(&self, index: usize) -> Option<NodeId> {
        self.node_rows()
            .get(index)?
            .nodes
            .iter()
            .copied()
            .find(|&id| self.graph.node(id).is_commit())
    }

    /// Visible row index of `node`, if the node is shown
    pub fn visible_row_of(&self, node: NodeId) -> Option<usize> {
        if !self.is_visible_node(node) {
            return None;
        }
        let row = self.graph.node(node).row();
        let hidden_above = self.graph.all_rows()[..row]
            .iter()
            .filter(|r| !r.nodes.iter().any(|&id| self.is_visible_node(id)))
            .count();
        Some(row - hidden_above)
    }
}
