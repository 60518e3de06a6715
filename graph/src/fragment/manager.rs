use super::Fragment;
use crate::core::{Edge, EdgeId, EdgeType, Graph, NodeId};
use crate::decor::GraphDecorator;
use crate::error::{GraphError, Result};
use smallvec::SmallVec;
use std::collections::HashMap;
use tracing::debug;

/// Collapses fragments into single hide-fragment edges and expands them back.
///
/// The manager is also the decorator that exposes those edges: a node with a
/// hide-fragment edge below it shows that edge instead of its real ones.
#[derive(Debug, Default)]
pub struct FragmentManager {
    hidden: HashMap<EdgeId, Fragment>,
    /// Hide-fragment edge below a fragment's up node
    by_up: HashMap<NodeId, EdgeId>,
    /// Hide-fragment edges ending in a node; only the one whose up node is
    /// visible is active, the rest are nested inside an outer fragment
    by_down: HashMap<NodeId, SmallVec<[EdgeId; 1]>>,
    /// Slots of shown fragments, reused for the next hide
    free_edges: Vec<EdgeId>,
}

impl FragmentManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the inside of `fragment` with one hide-fragment edge
    pub fn hide(&mut self, graph: &mut Graph, fragment: Fragment) -> Result<EdgeId> {
        let Fragment { up, down, .. } = fragment;
        if let Some(&existing) = self.by_up.get(&up) {
            return Err(GraphError::AlreadyHidden {
                up,
                down: graph.edge(existing).down(),
            });
        }
        for boundary in [up, down] {
            if !graph.node(boundary).is_visible() {
                return Err(GraphError::HiddenBoundary(boundary));
            }
        }
        if fragment
            .intermediate
            .iter()
            .any(|&node| !graph.node(node).is_visible())
        {
            return Err(GraphError::StaleFragment { up, down });
        }

        let edge = Edge::new(up, down, EdgeType::HideFragment, graph.node(up).branch());
        let id = match self.free_edges.pop() {
            Some(id) => {
                graph.replace_detached_edge(id, edge);
                id
            }
            None => graph.add_detached_edge(edge),
        };

        for &node in &fragment.intermediate {
            graph.set_visible(node, false);
        }
        debug!(%up, %down, nodes = fragment.intermediate.len(), "hid fragment");

        self.by_up.insert(up, id);
        self.by_down.entry(down).or_default().push(id);
        self.hidden.insert(id, fragment);
        Ok(id)
    }

    /// Expand a hidden fragment again; exact inverse of [`hide`](Self::hide)
    pub fn show(&mut self, graph: &mut Graph, fragment: &Fragment) -> Result<Fragment> {
        let (up, down) = (fragment.up, fragment.down);
        let id = self
            .by_up
            .get(&up)
            .copied()
            .filter(|&id| graph.edge(id).down() == down)
            .ok_or(GraphError::NotHidden { up, down })?;
        self.show_edge(graph, id)
    }

    /// Expand the fragment behind hide-fragment edge `id`
    pub fn show_edge(&mut self, graph: &mut Graph, id: EdgeId) -> Result<Fragment> {
        let Some(fragment) = self.hidden.remove(&id) else {
            let edge = graph.edge(id);
            return Err(GraphError::NotHidden {
                up: edge.up(),
                down: edge.down(),
            });
        };
        if !graph.node(fragment.up).is_visible() {
            let up = fragment.up;
            self.hidden.insert(id, fragment);
            return Err(GraphError::HiddenBoundary(up));
        }

        self.by_up.remove(&fragment.up);
        if let Some(edges) = self.by_down.get_mut(&fragment.down) {
            edges.retain(|e| *e != id);
            if edges.is_empty() {
                self.by_down.remove(&fragment.down);
            }
        }
        self.free_edges.push(id);

        for &node in &fragment.intermediate {
            graph.set_visible(node, true);
        }
        debug!(up = %fragment.up, down = %fragment.down, "showed fragment");
        Ok(fragment)
    }

    /// Fragment collapsed behind `edge`, if it is a hide-fragment edge
    pub fn relate(&self, edge: EdgeId) -> Option<&Fragment> {
        self.hidden.get(&edge)
    }

    pub fn is_hidden(&self, fragment: &Fragment) -> bool {
        self.by_up
            .get(&fragment.up)
            .and_then(|id| self.hidden.get(id))
            .map_or(false, |hidden| hidden.down == fragment.down)
    }

    /// Hidden fragments whose up node is currently shown
    pub fn outermost(&self, graph: &Graph) -> Vec<Fragment> {
        let mut fragments: Vec<Fragment> = self
            .hidden
            .values()
            .filter(|f| graph.node(f.up).is_visible())
            .cloned()
            .collect();
        fragments.sort_by_key(|f| f.up);
        fragments
    }

    pub fn hidden_count(&self) -> usize {
        self.hidden.len()
    }
}

impl GraphDecorator for FragmentManager {
    fn hide_fragment_down_edge(&self, _graph: &Graph, node: NodeId) -> Option<EdgeId> {
        self.by_up.get(&node).copied()
    }

    fn hide_fragment_up_edge(&self, graph: &Graph, node: NodeId) -> Option<EdgeId> {
        self.by_down
            .get(&node)?
            .iter()
            .copied()
            .find(|&e| graph.node(graph.edge(e).up()).is_visible())
    }
}
