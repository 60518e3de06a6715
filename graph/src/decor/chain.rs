use super::GraphDecorator;
use crate::core::{EdgeId, EdgeList, Graph, NodeId};
use std::collections::HashSet;

/// Branch filter layered over another decorator (usually the fragment
/// overlay).
///
/// A node is visible when the inner decorator shows it and it is reachable
/// from a selected branch head. Up edges coming from hidden nodes are
/// dropped so no edge dangles into the view; down edges are passed through.
pub struct BranchDecorator<'a, D: GraphDecorator + ?Sized> {
    pre: &'a D,
    /// `None` shows every branch
    reachable: Option<&'a HashSet<NodeId>>,
}

impl<'a, D: GraphDecorator + ?Sized> BranchDecorator<'a, D> {
    pub fn new(pre: &'a D, reachable: Option<&'a HashSet<NodeId>>) -> Self {
        Self { pre, reachable }
    }
}

impl<D: GraphDecorator + ?Sized> GraphDecorator for BranchDecorator<'_, D> {
    fn is_visible_node(&self, graph: &Graph, node: NodeId) -> bool {
        self.pre.is_visible_node(graph, node)
            && self.reachable.map_or(true, |set| set.contains(&node))
    }

    fn hide_fragment_down_edge(&self, graph: &Graph, node: NodeId) -> Option<EdgeId> {
        self.pre.hide_fragment_down_edge(graph, node)
    }

    fn hide_fragment_up_edge(&self, graph: &Graph, node: NodeId) -> Option<EdgeId> {
        self.pre.hide_fragment_up_edge(graph, node)
    }

    fn down_edges(&self, graph: &Graph, node: NodeId) -> EdgeList {
        self.pre.down_edges(graph, node)
    }

    fn up_edges(&self, graph: &Graph, node: NodeId) -> EdgeList {
        let mut edges = self.pre.up_edges(graph, node);
        edges.retain(|edge| self.is_visible_node(graph, graph.edge(*edge).up()));
        edges
    }
}
