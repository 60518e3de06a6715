use crate::core::{EdgeType, NodeId, NodeRow};
use crate::decor::{GraphDecorator, GraphView};
use smallvec::SmallVec;
use std::ops::Range;

/// Everything a renderer draws for one visible row
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RowSignature {
    nodes: Vec<NodeSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeSignature {
    node: NodeId,
    down: SmallVec<[(NodeId, EdgeType); 2]>,
    up: SmallVec<[NodeId; 2]>,
}

pub(crate) fn snapshot<D: GraphDecorator>(
    view: &GraphView<'_, D>,
    rows: &[NodeRow],
) -> Vec<RowSignature> {
    let graph = view.graph();
    rows.iter()
        .map(|row| RowSignature {
            nodes: row
                .nodes
                .iter()
                .map(|&node| NodeSignature {
                    node,
                    down: view
                        .down_edges(node)
                        .iter()
                        .map(|&e| (graph.edge(e).down(), graph.edge(e).edge_type()))
                        .collect(),
                    up: view.up_nodes(node),
                })
                .collect(),
        })
        .collect()
}

/// Smallest contiguous block of rows that differs between two snapshots.
///
/// Returns `(old, new)` half-open ranges, or `None` when nothing changed.
pub(crate) fn replaced_range(
    old: &[RowSignature],
    new: &[RowSignature],
) -> Option<(Range<usize>, Range<usize>)> {
    let prefix = old.iter().zip(new).take_while(|(a, b)| a == b).count();
    if prefix == old.len() && prefix == new.len() {
        return None;
    }

    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    Some((prefix..old.len() - suffix, prefix..new.len() - suffix))
}
