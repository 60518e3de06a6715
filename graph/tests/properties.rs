use graph::{
    BranchFilter, Commit, DefaultDecorator, EdgeId, EdgeType, FragmentGenerator, FragmentManager,
    Graph, GraphBuilder, GraphDecorator, NodeId, NodeType,
};
use proptest::prelude::*;
use std::collections::HashSet;

/// Random log, newest first. Parents are always older commits or hashes
/// outside the log.
fn history() -> impl Strategy<Value = Vec<Commit>> {
    (1usize..24).prop_flat_map(|len| {
        prop::collection::vec(prop::collection::vec(0usize..len + 3, 0..3), len).prop_map(
            move |parents| {
                parents
                    .into_iter()
                    .enumerate()
                    .map(|(i, picks)| {
                        let mut seen = HashSet::new();
                        let parents = picks
                            .into_iter()
                            .filter(|&p| p > i)
                            .filter(|&p| seen.insert(p))
                            .map(|p| {
                                if p < len {
                                    format!("c{}", p)
                                } else {
                                    format!("ext{}", p)
                                }
                            })
                            .collect();
                        Commit::new(format!("c{}", i), parents)
                    })
                    .collect()
            },
        )
    })
}

fn build(commits: &[Commit]) -> Graph {
    GraphBuilder::new().build(commits).unwrap()
}

type NodeState = (NodeId, bool, Vec<EdgeId>, Vec<EdgeId>);

fn overlay_state(graph: &Graph, manager: &FragmentManager) -> Vec<NodeState> {
    graph
        .nodes()
        .map(|n| {
            (
                n.id(),
                manager.is_visible_node(graph, n.id()),
                manager.down_edges(graph, n.id()).to_vec(),
                manager.up_edges(graph, n.id()).to_vec(),
            )
        })
        .collect()
}

/// Every node sits in exactly one row, rows are indexed in order, and every
/// edge points to a lower row
fn check_layout(graph: &Graph) -> Result<(), TestCaseError> {
    let mut seen = HashSet::new();
    for (index, row) in graph.all_rows().iter().enumerate() {
        prop_assert_eq!(row.index, index);
        for &id in &row.nodes {
            prop_assert!(seen.insert(id));
            prop_assert_eq!(graph.node(id).row(), index);
        }
    }
    prop_assert_eq!(seen.len(), graph.node_count());

    for (index, row) in graph.visible_rows().iter().enumerate() {
        prop_assert_eq!(row.index, index);
        prop_assert!(!row.nodes.is_empty());
    }

    for node in graph.nodes() {
        for down in graph.down_nodes(node.id()) {
            prop_assert!(node.row() < graph.node(down).row());
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn single_build_keeps_layout_invariants(commits in history()) {
        check_layout(&build(&commits))?;
    }

    #[test]
    fn commit_rows_follow_log_order(commits in history()) {
        let graph = build(&commits);
        for (index, commit) in commits.iter().enumerate() {
            let id = graph.commit_node(&commit.hash).unwrap();
            prop_assert_eq!(graph.node(id).row(), index);
            prop_assert_eq!(graph.node(id).node_type(), NodeType::Commit);
        }
    }

    #[test]
    fn append_matches_single_build(
        commits in history(),
        cuts in prop::collection::vec(0usize..24, 1..4),
    ) {
        let whole = build(&commits);

        // batch boundaries, first batch never empty
        let mut cuts: Vec<usize> = cuts.into_iter().map(|c| c % commits.len() + 1).collect();
        cuts.push(commits.len());
        cuts.sort_unstable();
        cuts.dedup();

        let mut builder = GraphBuilder::new();
        let mut graph = builder.build(&commits[..cuts[0]]).unwrap();
        check_layout(&graph)?;
        for pair in cuts.windows(2) {
            let rebuilt = builder.append(&mut graph, &commits[pair[0]..pair[1]]).unwrap();
            prop_assert_eq!(rebuilt.end, graph.row_count());
            check_layout(&graph)?;
        }

        let stats = graph.stats();
        prop_assert_eq!(stats.commit_nodes, commits.len());
        prop_assert_eq!(
            graph.edge_count() - stats.edge_nodes,
            whole.edge_count() - whole.stats().edge_nodes
        );
        for (index, commit) in commits.iter().enumerate() {
            let id = graph.commit_node(&commit.hash).unwrap();
            prop_assert_eq!(graph.node(id).row(), index);
        }
    }

    #[test]
    fn hide_then_show_restores_overlay(commits in history()) {
        let mut graph = build(&commits);
        let mut manager = FragmentManager::new();
        let generator = FragmentGenerator::new();
        let before = overlay_state(&graph, &manager);

        for commit in &commits {
            let start = graph.commit_node(&commit.hash).unwrap();
            let Some(fragment) = generator.short_fragment(&graph, &manager, start) else {
                continue;
            };

            let edge = manager.hide(&mut graph, fragment.clone()).unwrap();
            prop_assert_eq!(graph.edge(edge).edge_type(), EdgeType::HideFragment);
            for &inner in fragment.intermediate() {
                prop_assert!(!graph.node(inner).is_visible());
            }

            manager.show(&mut graph, &fragment).unwrap();
            prop_assert_eq!(overlay_state(&graph, &manager), before.clone());
        }
    }

    #[test]
    fn short_fragment_is_minimal(commits in history()) {
        let graph = build(&commits);
        for commit in &commits {
            let start = graph.commit_node(&commit.hash).unwrap();
            let Some(fragment) = FragmentGenerator::new()
                .short_fragment(&graph, &DefaultDecorator, start) else {
                continue;
            };

            // nothing closes before the returned down node
            let span = graph.node(fragment.down()).row() - graph.node(start).row();
            let shorter = FragmentGenerator::new()
                .with_search_limit(span - 1)
                .short_fragment(&graph, &DefaultDecorator, start);
            prop_assert!(shorter.is_none());
            prop_assert!(graph.node(fragment.down()).is_commit());
        }
    }

    #[test]
    fn more_heads_reach_more_nodes(
        commits in history(),
        picks in prop::collection::vec(any::<bool>(), 24),
    ) {
        let graph = build(&commits);
        let small: HashSet<&str> = commits
            .iter()
            .zip(&picks)
            .filter(|&(_, &pick)| pick)
            .map(|(c, _)| c.hash.as_str())
            .collect();
        let mut large = small.clone();
        large.insert(commits[0].hash.as_str());

        let a = BranchFilter::reachable_from(&graph, &DefaultDecorator, |n| {
            n.is_commit() && small.contains(n.hash())
        });
        let b = BranchFilter::reachable_from(&graph, &DefaultDecorator, |n| {
            n.is_commit() && large.contains(n.hash())
        });
        prop_assert!(a.is_subset(&b));
    }
}
