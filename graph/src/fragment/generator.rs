use super::Fragment;
use crate::core::{Graph, Node, NodeId};
use crate::decor::GraphDecorator;
use smallvec::SmallVec;
use std::collections::HashSet;

/// Finds collapsible regions below a commit node.
///
/// The search runs over the edges a decorator exposes, so regions that are
/// already collapsed count as a single edge.
#[derive(Default)]
pub struct FragmentGenerator {
    /// Nodes that must stay visible (e.g. branch heads)
    unhidden: Option<Box<dyn Fn(&Node) -> bool>>,
    /// Maximum number of rows below the start node to look at
    search_limit: Option<usize>,
}

impl FragmentGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unhidden_nodes(mut self, unhidden: impl Fn(&Node) -> bool + 'static) -> Self {
        self.unhidden = Some(Box::new(unhidden));
        self
    }

    pub fn with_search_limit(mut self, rows: usize) -> Self {
        self.search_limit = Some(rows);
        self
    }

    fn is_unhidden(&self, node: &Node) -> bool {
        self.unhidden.as_ref().map_or(false, |f| f(node))
    }

    /// Smallest fragment starting at commit node `start`.
    ///
    /// Scans the rows below `start` once, growing the set of nodes known to
    /// be inside. The first commit node that is expected last and whose up
    /// nodes are all inside closes the fragment. A node entered from outside,
    /// or one that must not be hidden, ends the search without a result.
    pub fn short_fragment<D: GraphDecorator + ?Sized>(
        &self,
        graph: &Graph,
        decorator: &D,
        start: NodeId,
    ) -> Option<Fragment> {
        let start_node = graph.node(start);
        if !start_node.is_commit() || !decorator.is_visible_node(graph, start) {
            return None;
        }

        let mut up_nodes: HashSet<NodeId> = HashSet::from([start]);
        let mut not_added: HashSet<NodeId> =
            down_nodes(graph, decorator, start).into_iter().collect();

        let rows = graph.all_rows();
        let first = start_node.row() + 1;
        let last = self
            .search_limit
            .map_or(rows.len(), |limit| {
                first.saturating_add(limit).min(rows.len())
            });

        for row in rows.get(first..last)? {
            for &id in &row.nodes {
                if not_added.is_empty() {
                    return None;
                }
                if !not_added.remove(&id) {
                    continue;
                }

                let entered_from_inside = decorator
                    .up_edges(graph, id)
                    .iter()
                    .all(|&e| up_nodes.contains(&graph.edge(e).up()));

                let node = graph.node(id);
                if not_added.is_empty() && node.is_commit() && entered_from_inside {
                    up_nodes.remove(&start);
                    return Some(Fragment {
                        up: start,
                        down: id,
                        intermediate: up_nodes.into_iter().collect(),
                    });
                }
                if !entered_from_inside || self.is_unhidden(node) {
                    return None;
                }

                up_nodes.insert(id);
                not_added.extend(down_nodes(graph, decorator, id));
            }
        }
        None
    }

    /// Longest run of short fragments starting at `start`, joined end to end
    pub fn maximum_down_fragment<D: GraphDecorator + ?Sized>(
        &self,
        graph: &Graph,
        decorator: &D,
        start: NodeId,
    ) -> Option<Fragment> {
        let mut fragment = self.short_fragment(graph, decorator, start)?;
        let max_row = self
            .search_limit
            .map(|limit| graph.node(start).row().saturating_add(limit));

        while !self.is_unhidden(graph.node(fragment.down)) {
            let Some(next) = self.short_fragment(graph, decorator, fragment.down) else {
                break;
            };
            if max_row.map_or(false, |max| graph.node(next.down).row() > max) {
                break;
            }
            let Fragment {
                down, intermediate, ..
            } = next;
            fragment.intermediate.insert(fragment.down);
            fragment.intermediate.extend(intermediate);
            fragment.down = down;
        }
        Some(fragment)
    }
}

fn down_nodes<D: GraphDecorator + ?Sized>(
    graph: &Graph,
    decorator: &D,
    id: NodeId,
) -> SmallVec<[NodeId; 2]> {
    decorator
        .down_edges(graph, id)
        .iter()
        .map(|&e| graph.edge(e).down())
        .collect()
}
