use crate::core::{Branch, BranchId, Commit, Graph, NodeId, NodeRow, NodeType};
use crate::error::{GraphError, Result};
use std::collections::{HashMap, HashSet};
use std::ops::Range;
use tracing::{debug, trace, warn};

/// Lays an ordered commit log (newest first) out into rows.
///
/// Row `r` holds the `r`-th commit plus any edge nodes an edge needs to pass
/// through it. The builder keeps the parents it has not seen yet, so older
/// commits can be appended to a graph later on.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    /// Nodes referenced as parents whose own commit is not placed yet
    underdone: HashMap<String, NodeId>,
    /// Edge nodes already assigned to the row that is being filled
    next_row: Vec<NodeId>,
    /// Last row of the graph holds unresolved parents as end commits
    has_end_row: bool,
}

/// Log positions of the commits in one build or append call
struct Batch<'a> {
    log_index: HashMap<&'a str, usize>,
    /// Row that parents outside the batch are expected in
    end_row: usize,
}

impl Batch<'_> {
    fn expected_row(&self, hash: &str) -> usize {
        self.log_index.get(hash).copied().unwrap_or(self.end_row)
    }
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fresh graph; an empty log is rejected
    pub fn build(&mut self, commits: &[Commit]) -> Result<Graph> {
        if commits.is_empty() {
            return Err(GraphError::EmptyLog);
        }

        *self = Self::default();
        let mut graph = Graph::new();
        self.append(&mut graph, commits)?;
        Ok(graph)
    }

    /// Continue the layout of `graph` with older commits.
    ///
    /// Returns the range of `all_rows` that was (re)built. The trailing row of
    /// end commits, if any, is reopened and reused; finalized commit rows are
    /// left as they are.
    pub fn append(&mut self, graph: &mut Graph, commits: &[Commit]) -> Result<Range<usize>> {
        check_unique(graph, commits)?;
        if commits.is_empty() {
            let rows = graph.row_count();
            return Ok(rows..rows);
        }

        self.reopen_end_row(graph);
        let first_row = graph.row_count();
        let batch = Batch {
            log_index: commits
                .iter()
                .enumerate()
                .map(|(i, c)| (c.hash.as_str(), first_row + i))
                .collect(),
            end_row: first_row + commits.len(),
        };

        for commit in commits {
            let node = self.add_commit_and_finish_row(graph, &commit.hash);
            self.add_parents(graph, node, commit, &batch);
        }
        self.finish(graph);

        debug!(
            commits = commits.len(),
            rows = graph.row_count(),
            pending = self.underdone.len(),
            "laid out commits"
        );
        Ok(first_row..graph.row_count())
    }

    /// Parents referenced by the graph whose commits were never seen
    pub fn pending_parents(&self) -> impl Iterator<Item = &str> {
        self.underdone.keys().map(String::as_str)
    }

    fn reopen_end_row(&mut self, graph: &mut Graph) {
        if !std::mem::take(&mut self.has_end_row) {
            return;
        }
        if let Some(row) = graph.pop_row() {
            let pending: HashSet<NodeId> = self.underdone.values().copied().collect();
            self.next_row = row
                .nodes
                .into_iter()
                .filter(|id| !pending.contains(id))
                .collect();
            trace!(row = row.index, "reopened end row");
        }
    }

    fn add_commit_and_finish_row(&mut self, graph: &mut Graph, hash: &str) -> NodeId {
        let index = graph.row_count();
        let node = match self.underdone.remove(hash) {
            Some(node) => node,
            None => {
                let branch = graph.add_branch(Branch::Trunk(hash.to_string()));
                graph.add_node(hash, branch, index)
            }
        };
        graph.place(node, index, NodeType::Commit);

        let mut row = NodeRow {
            index,
            nodes: std::mem::take(&mut self.next_row),
        };
        row.nodes.push(node);
        graph.sort_row(&mut row);
        graph.push_row(row);
        node
    }

    fn add_parents(&mut self, graph: &mut Graph, node: NodeId, commit: &Commit, batch: &Batch) {
        if let [parent] = commit.parents.as_slice() {
            let branch = graph.node(node).branch();
            self.add_parent(graph, node, parent, branch, batch);
            return;
        }

        for parent in &commit.parents {
            let branch = graph.add_branch(Branch::Merge {
                child: commit.hash.clone(),
                parent: parent.clone(),
            });
            trace!(branch = %graph.branch(branch), "opened merge branch");
            self.add_parent(graph, node, parent, branch, batch);
        }
    }

    fn add_parent(
        &mut self,
        graph: &mut Graph,
        node: NodeId,
        parent: &str,
        branch: BranchId,
        batch: &Batch,
    ) {
        if graph.contains_commit(parent) {
            warn!(
                commit = graph.node(node).hash(),
                parent, "parent is already laid out above its child, skipping edge"
            );
            return;
        }

        let next_row = graph.row_count();
        let parent_row = batch.expected_row(parent);

        let Some(parent_node) = self.underdone.remove(parent) else {
            let parent_node = graph.add_node(parent, branch, parent_row);
            graph.add_edge(node, parent_node, branch);
            self.underdone.insert(parent.to_string(), parent_node);
            return;
        };

        graph.add_edge(node, parent_node, branch);
        if parent_row == next_row {
            self.underdone.insert(parent.to_string(), parent_node);
            return;
        }

        // The parent lands further down: join the edges in the next row and
        // keep going with a fresh node
        graph.place(parent_node, next_row, NodeType::Edge);
        self.next_row.push(parent_node);

        let parent_branch = graph.node(parent_node).branch();
        let chained = graph.add_node(parent, parent_branch, parent_row);
        graph.add_edge(parent_node, chained, parent_branch);
        self.underdone.insert(parent.to_string(), chained);
        trace!(parent, row = next_row, "inserted edge node");
    }

    fn finish(&mut self, graph: &mut Graph) {
        if self.underdone.is_empty() && self.next_row.is_empty() {
            return;
        }

        let index = graph.row_count();
        let mut ends: Vec<NodeId> = self.underdone.values().copied().collect();
        ends.sort();
        for &id in &ends {
            graph.place(id, index, NodeType::EndCommit);
        }

        let mut row = NodeRow {
            index,
            nodes: std::mem::take(&mut self.next_row),
        };
        row.nodes.extend(ends);
        graph.sort_row(&mut row);
        graph.push_row(row);
        self.has_end_row = true;
    }
}

fn check_unique(graph: &Graph, commits: &[Commit]) -> Result<()> {
    let mut seen = HashSet::with_capacity(commits.len());
    for commit in commits {
        if graph.contains_commit(&commit.hash) || !seen.insert(commit.hash.as_str()) {
            return Err(GraphError::DuplicateCommit(commit.hash.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{commit, EdgeType};
    use pretty_assertions::assert_eq;

    fn diamond() -> Vec<Commit> {
        vec![
            commit("C1", &["C2"]),
            commit("C2", &["C3", "C4"]),
            commit("C3", &["C5"]),
            commit("C4", &["C5"]),
            commit("C5", &[]),
        ]
    }

    fn hashes(graph: &Graph, row: usize) -> Vec<&str> {
        graph.all_rows()[row]
            .nodes
            .iter()
            .map(|&id| graph.node(id).hash())
            .collect()
    }

    #[test]
    fn test_diamond_layout() {
        let graph = GraphBuilder::new().build(&diamond()).unwrap();

        assert_eq!(graph.row_count(), 5);
        for (row, hash) in ["C1", "C2", "C3", "C4", "C5"].iter().enumerate() {
            assert_eq!(hashes(&graph, row), vec![*hash]);
        }

        let c2 = graph.node(graph.commit_node("C2").unwrap());
        let down: Vec<&str> = graph
            .down_nodes(c2.id())
            .map(|id| graph.node(id).hash())
            .collect();
        assert_eq!(down, vec!["C3", "C4"]);

        let branches: Vec<_> = c2
            .down_edges()
            .iter()
            .map(|&e| graph.edge(e).branch())
            .collect();
        assert_ne!(branches[0], branches[1]);
        assert!(c2
            .down_edges()
            .iter()
            .all(|&e| graph.edge(e).edge_type() == EdgeType::Usual));
    }

    #[test]
    fn test_single_parent_shares_branch() {
        let graph = GraphBuilder::new().build(&diamond()).unwrap();
        let c1 = graph.node(graph.commit_node("C1").unwrap());
        let c2 = graph.node(graph.commit_node("C2").unwrap());
        assert_eq!(c1.branch(), c2.branch());
        assert_eq!(graph.branch(c1.branch()), &Branch::Trunk("C1".to_string()));

        let c3 = graph.node(graph.commit_node("C3").unwrap());
        assert_eq!(
            graph.branch(c3.branch()),
            &Branch::Merge {
                child: "C2".to_string(),
                parent: "C3".to_string()
            }
        );
        assert_eq!(graph.branch(c3.branch()).to_string(), "C2->C3");
    }

    #[test]
    fn test_empty_log_rejected() {
        assert_eq!(GraphBuilder::new().build(&[]).unwrap_err(), GraphError::EmptyLog);
    }

    #[test]
    fn test_unknown_parent_becomes_end_commit() {
        let graph = GraphBuilder::new()
            .build(&[commit("b", &["a"])])
            .unwrap();

        assert_eq!(graph.row_count(), 2);
        let end = graph.all_rows()[1].nodes[0];
        assert_eq!(graph.node(end).node_type(), NodeType::EndCommit);
        assert_eq!(graph.node(end).hash(), "a");
        assert!(!graph.contains_commit("a"));
    }

    #[test]
    fn test_edge_node_for_distant_parent() {
        let graph = GraphBuilder::new()
            .build(&[
                commit("a", &["c"]),
                commit("b", &["c"]),
                commit("x", &[]),
                commit("c", &[]),
            ])
            .unwrap();

        assert_eq!(graph.row_count(), 4);
        assert_eq!(hashes(&graph, 2), vec!["c", "x"]);

        let pass = graph.all_rows()[2].nodes[0];
        assert_eq!(graph.node(pass).node_type(), NodeType::Edge);
        assert_eq!(graph.up_nodes(pass).count(), 2);

        let c = graph.commit_node("c").unwrap();
        assert_eq!(graph.node(c).row(), 3);
        assert_eq!(graph.up_nodes(c).collect::<Vec<_>>(), vec![pass]);
    }

    #[test]
    fn test_append_reopens_end_row() {
        let mut builder = GraphBuilder::new();
        let mut graph = builder.build(&[commit("c", &["b"])]).unwrap();
        assert_eq!(graph.row_count(), 2);
        let pending = graph.all_rows()[1].nodes[0];

        let rebuilt = builder.append(&mut graph, &[commit("b", &["a"])]).unwrap();
        assert_eq!(rebuilt, 1..3);
        assert_eq!(graph.row_count(), 3);
        assert_eq!(graph.node_count(), 3);

        // the end node turned into the real commit
        assert_eq!(graph.commit_node("b"), Some(pending));
        assert_eq!(graph.node(pending).node_type(), NodeType::Commit);
        assert_eq!(hashes(&graph, 2), vec!["a"]);
        assert_eq!(builder.pending_parents().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_append_keeps_finalized_rows() {
        let mut builder = GraphBuilder::new();
        let mut graph = builder.build(&diamond()).unwrap();
        let before = graph.all_rows().to_vec();

        let rebuilt = builder
            .append(&mut graph, &[commit("C6", &["C1"])])
            .unwrap();

        assert_eq!(rebuilt, 5..6);
        assert_eq!(&graph.all_rows()[..5], &before[..]);
        let c6 = graph.commit_node("C6").unwrap();
        assert!(graph.node(c6).down_edges().is_empty());
    }

    #[test]
    fn test_duplicate_commit_rejected() {
        let mut builder = GraphBuilder::new();
        let mut graph = builder.build(&diamond()).unwrap();

        let err = builder
            .append(&mut graph, &[commit("C9", &[]), commit("C3", &[])])
            .unwrap_err();
        assert_eq!(err, GraphError::DuplicateCommit("C3".to_string()));
        assert_eq!(graph.row_count(), 5);
        assert!(!graph.contains_commit("C9"));
    }

    #[test]
    fn test_empty_append_is_noop() {
        let mut builder = GraphBuilder::new();
        let mut graph = builder.build(&[commit("b", &["a"])]).unwrap();
        assert_eq!(builder.append(&mut graph, &[]).unwrap(), 2..2);
        assert_eq!(graph.row_count(), 2);
    }
}
