use graph::{GraphDecorator, GraphView, NodeId, NodeType};
use std::collections::HashMap;

const SHORT_HASH: usize = 8;

/// One text line per visible row: a marker per node, then the row's commit.
///
/// `*` commit, `+` commit with a collapsed region below, `|` edge node,
/// `x` parent outside the loaded history.
pub fn render_rows<D: GraphDecorator>(
    view: &GraphView<'_, D>,
    labels: &HashMap<String, Vec<String>>,
) -> Vec<String> {
    view.node_rows()
        .iter()
        .map(|row| {
            let markers: Vec<char> = row.nodes.iter().map(|&id| marker(view, id)).collect();
            let mut line: String = markers
                .iter()
                .flat_map(|&m| [m, ' '])
                .collect();

            let commit = row
                .nodes
                .iter()
                .map(|&id| view.graph().node(id))
                .find(|node| node.is_commit());
            if let Some(node) = commit {
                line.push_str(short(node.hash()));
                if let Some(names) = labels.get(node.hash()) {
                    line.push_str(&format!(" ({})", names.join(", ")));
                }
            }
            line.trim_end().to_string()
        })
        .collect()
}

fn marker<D: GraphDecorator>(view: &GraphView<'_, D>, id: NodeId) -> char {
    let graph = view.graph();
    match graph.node(id).node_type() {
        NodeType::Commit => {
            let collapsed = view
                .down_edges(id)
                .iter()
                .any(|&e| graph.edge(e).is_hide_fragment());
            if collapsed {
                '+'
            } else {
                '*'
            }
        }
        NodeType::Edge => '|',
        NodeType::EndCommit => 'x',
    }
}

fn short(hash: &str) -> &str {
    hash.get(..SHORT_HASH).unwrap_or(hash)
}
