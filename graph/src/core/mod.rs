pub mod branch;
pub mod commit;
pub mod edge;
pub mod graph;
pub mod node;
pub mod row;

pub use branch::{Branch, BranchId};
pub use commit::{commit, Commit};
pub use edge::{Edge, EdgeId, EdgeType};
pub use graph::{Graph, GraphStats};
pub use node::{EdgeList, Node, NodeId, NodeType};
pub use row::NodeRow;
