use super::branch::{Branch, BranchId};
use super::edge::{Edge, EdgeId, EdgeType};
use super::node::{Node, NodeId, NodeType};
use super::row::NodeRow;
use std::collections::HashMap;

/// Row laid out commit graph.
///
/// Nodes, edges and branches live in arenas and are addressed by their ids.
/// Nodes are never removed; collapsing history only flips their visibility.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    branches: Vec<Branch>,
    /// Append-only; row `i` has index `i`
    rows: Vec<NodeRow>,
    /// Quick lookup: commit hash -> placed commit node
    commits: HashMap<String, NodeId>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    pub fn branch(&self, id: BranchId) -> &Branch {
        &self.branches[id.0]
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// All rows, including rows whose nodes are currently hidden
    pub fn all_rows(&self) -> &[NodeRow] {
        &self.rows
    }

    /// Rows with at least one visible node, reindexed from 0
    pub fn visible_rows(&self) -> Vec<NodeRow> {
        self.view().node_rows()
    }

    /// Commit node placed for `hash`, if the commit is part of the graph
    pub fn commit_node(&self, hash: &str) -> Option<NodeId> {
        self.commits.get(hash).copied()
    }

    pub fn contains_commit(&self, hash: &str) -> bool {
        self.commits.contains_key(hash)
    }

    pub fn up_nodes(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id).up_edges.iter().map(move |&e| self.edge(e).up)
    }

    pub fn down_nodes(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id).down_edges.iter().map(move |&e| self.edge(e).down)
    }

    /// Count of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Count of usual edges (hide-fragment edges are overlay state)
    pub fn edge_count(&self) -> usize {
        self.edges
            .iter()
            .filter(|e| e.edge_type == EdgeType::Usual)
            .count()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get statistics about the graph
    pub fn stats(&self) -> GraphStats {
        let count = |t: NodeType| self.nodes.iter().filter(|n| n.node_type == t).count();
        let merge_commits = self
            .nodes
            .iter()
            .filter(|n| n.is_commit() && n.down_edges.len() > 1)
            .count();

        GraphStats {
            commit_nodes: count(NodeType::Commit),
            edge_nodes: count(NodeType::Edge),
            end_nodes: count(NodeType::EndCommit),
            merge_commits,
            total_edges: self.edge_count(),
            total_rows: self.rows.len(),
            branches: self.branches.len(),
        }
    }

    pub(crate) fn add_branch(&mut self, branch: Branch) -> BranchId {
        let id = BranchId(self.branches.len());
        self.branches.push(branch);
        id
    }

    /// Create an unplaced node; `row` is where it is expected to land
    pub(crate) fn add_node(&mut self, hash: &str, branch: BranchId, row: usize) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(id, hash.to_string(), branch, row));
        id
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Add a usual edge and hook it into both endpoints' edge lists
    pub(crate) fn add_edge(&mut self, up: NodeId, down: NodeId, branch: BranchId) -> EdgeId {
        let id = EdgeId(self.edges.len());
        self.edges.push(Edge::new(up, down, EdgeType::Usual, branch));
        self.nodes[up.0].down_edges.push(id);
        self.nodes[down.0].up_edges.push(id);
        id
    }

    /// Add an edge that is not attached to its endpoints.
    ///
    /// Hide-fragment edges are only reachable through the fragment overlay.
    pub(crate) fn add_detached_edge(&mut self, edge: Edge) -> EdgeId {
        let id = EdgeId(self.edges.len());
        self.edges.push(edge);
        id
    }

    pub(crate) fn replace_detached_edge(&mut self, id: EdgeId, edge: Edge) {
        self.edges[id.0] = edge;
    }

    /// Pin a node to row `row` with its final type
    pub(crate) fn place(&mut self, id: NodeId, row: usize, node_type: NodeType) {
        let node = &mut self.nodes[id.0];
        node.row = row;
        node.node_type = node_type;
        if node_type == NodeType::Commit {
            self.commits.insert(node.hash.clone(), id);
        }
    }

    /// Order a row's nodes by column: branch creation order, then node order
    pub(crate) fn sort_row(&self, row: &mut NodeRow) {
        row.nodes.sort_by_key(|&id| (self.nodes[id.0].branch, id));
    }

    pub(crate) fn push_row(&mut self, row: NodeRow) {
        debug_assert_eq!(row.index, self.rows.len());
        self.rows.push(row);
    }

    pub(crate) fn pop_row(&mut self) -> Option<NodeRow> {
        self.rows.pop()
    }

    pub(crate) fn set_visible(&mut self, id: NodeId, visible: bool) {
        self.nodes[id.0].visible = visible;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphStats {
    pub commit_nodes: usize,
    pub edge_nodes: usize,
    pub end_nodes: usize,
    pub merge_commits: usize,
    pub total_edges: usize,
    pub total_rows: usize,
    pub branches: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commit;
    use crate::layout::GraphBuilder;
    use pretty_assertions::assert_eq;

    fn build(commits: &[crate::core::Commit]) -> Graph {
        GraphBuilder::new().build(commits).unwrap()
    }

    #[test]
    fn test_stats_for_merge() {
        let graph = build(&[
            commit("m", &["a", "b"]),
            commit("a", &["base"]),
            commit("b", &["base"]),
            commit("base", &[]),
        ]);

        let stats = graph.stats();
        assert_eq!(stats.commit_nodes, 4);
        assert_eq!(stats.merge_commits, 1);
        assert_eq!(stats.end_nodes, 0);
        assert_eq!(stats.total_rows, 4);
        // base directly follows b, so no pass-through node is needed
        assert_eq!(stats.edge_nodes, 0);
        assert_eq!(stats.total_edges, 4);
    }

    #[test]
    fn test_commit_lookup() {
        let graph = build(&[commit("b", &["a"]), commit("a", &[])]);

        let b = graph.commit_node("b").unwrap();
        let a = graph.commit_node("a").unwrap();
        assert_eq!(graph.down_nodes(b).collect::<Vec<_>>(), vec![a]);
        assert_eq!(graph.up_nodes(a).collect::<Vec<_>>(), vec![b]);
        assert!(graph.commit_node("zzz").is_none());
    }

    #[test]
    fn test_visible_rows_skip_hidden_rows() {
        let mut graph = build(&[commit("c", &["b"]), commit("b", &["a"]), commit("a", &[])]);
        let b = graph.commit_node("b").unwrap();
        graph.set_visible(b, false);

        let rows = graph.visible_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].index, 0);
        assert_eq!(rows[1].index, 1);
        assert_eq!(rows[1].nodes, vec![graph.commit_node("a").unwrap()]);
        assert_eq!(graph.all_rows().len(), 3);
    }
}
