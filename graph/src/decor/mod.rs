pub mod chain;
pub mod view;

pub use chain::BranchDecorator;
pub use view::GraphView;

use crate::core::{EdgeId, EdgeList, Graph, NodeId};
use smallvec::smallvec;

/// Overlay deciding which nodes and edges of a [`Graph`] are shown.
///
/// Decorators never mutate the graph. A hide-fragment edge reported for a
/// node replaces all of that node's real edges on the same side.
pub trait GraphDecorator {
    fn is_visible_node(&self, graph: &Graph, node: NodeId) -> bool {
        graph.node(node).is_visible()
    }

    fn hide_fragment_down_edge(&self, _graph: &Graph, _node: NodeId) -> Option<EdgeId> {
        None
    }

    fn hide_fragment_up_edge(&self, _graph: &Graph, _node: NodeId) -> Option<EdgeId> {
        None
    }

    fn down_edges(&self, graph: &Graph, node: NodeId) -> EdgeList {
        match self.hide_fragment_down_edge(graph, node) {
            Some(edge) => smallvec![edge],
            None => graph.node(node).down_edges.clone(),
        }
    }

    fn up_edges(&self, graph: &Graph, node: NodeId) -> EdgeList {
        match self.hide_fragment_up_edge(graph, node) {
            Some(edge) => smallvec![edge],
            None => graph.node(node).up_edges.clone(),
        }
    }
}

/// Shows the graph as it is
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDecorator;

impl GraphDecorator for DefaultDecorator {}

impl<D: GraphDecorator + ?Sized> GraphDecorator for &D {
    fn is_visible_node(&self, graph: &Graph, node: NodeId) -> bool {
        (**self).is_visible_node(graph, node)
    }

    fn hide_fragment_down_edge(&self, graph: &Graph, node: NodeId) -> Option<EdgeId> {
        (**self).hide_fragment_down_edge(graph, node)
    }

    fn hide_fragment_up_edge(&self, graph: &Graph, node: NodeId) -> Option<EdgeId> {
        (**self).hide_fragment_up_edge(graph, node)
    }

    fn down_edges(&self, graph: &Graph, node: NodeId) -> EdgeList {
        (**self).down_edges(graph, node)
    }

    fn up_edges(&self, graph: &Graph, node: NodeId) -> EdgeList {
        (**self).up_edges(graph, node)
    }
}
