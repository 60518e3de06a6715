use crate::core::{Graph, Node, NodeId};
use crate::decor::GraphDecorator;
use std::collections::HashSet;
use std::convert::Infallible;

/// Restricts the graph to history reachable from selected branch heads
#[derive(Debug, Clone, Default)]
pub struct BranchFilter {
    /// `None` while every branch is shown
    reachable: Option<HashSet<NodeId>>,
}

impl BranchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reachable(&self) -> Option<&HashSet<NodeId>> {
        self.reachable.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.reachable.is_some()
    }

    pub fn set(&mut self, reachable: HashSet<NodeId>) {
        self.reachable = Some(reachable);
    }

    pub fn clear(&mut self) {
        self.reachable = None;
    }

    /// Nodes reachable from start nodes, following the decorator's down edges.
    ///
    /// Rows are already ordered top to bottom, so a single pass suffices.
    pub fn reachable_from<D, F>(graph: &Graph, decorator: &D, mut is_start: F) -> HashSet<NodeId>
    where
        D: GraphDecorator + ?Sized,
        F: FnMut(&Node) -> bool,
    {
        match Self::try_reachable_from(graph, decorator, |node| {
            Ok::<_, Infallible>(is_start(node))
        }) {
            Ok(reachable) => reachable,
            Err(never) => match never {},
        }
    }

    /// Like [`reachable_from`](Self::reachable_from); the predicate's error is
    /// returned as is
    pub fn try_reachable_from<D, F, E>(
        graph: &Graph,
        decorator: &D,
        mut is_start: F,
    ) -> Result<HashSet<NodeId>, E>
    where
        D: GraphDecorator + ?Sized,
        F: FnMut(&Node) -> Result<bool, E>,
    {
        let mut reachable = HashSet::new();
        for row in graph.all_rows() {
            for &id in &row.nodes {
                if !reachable.contains(&id) && !is_start(graph.node(id))? {
                    continue;
                }
                reachable.insert(id);
                reachable.extend(
                    decorator
                        .down_edges(graph, id)
                        .iter()
                        .map(|&e| graph.edge(e).down()),
                );
            }
        }
        Ok(reachable)
    }
}
