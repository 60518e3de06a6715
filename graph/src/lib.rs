//! Row layout of a commit log as a DAG, with collapsible fragments and
//! branch filtering.

pub mod core;
pub mod decor;
pub mod error;
pub mod fragment;
pub mod layout;
pub mod model;
pub mod query;

pub use crate::core::{
    commit, Branch, BranchId, Commit, Edge, EdgeId, EdgeType, Graph, GraphStats, Node, NodeId,
    NodeRow, NodeType,
};
pub use decor::{BranchDecorator, DefaultDecorator, GraphDecorator, GraphView};
pub use error::{GraphError, Result};
pub use fragment::{Fragment, FragmentGenerator, FragmentManager};
pub use layout::GraphBuilder;
pub use model::{GraphEvent, GraphModel, Subscription};
pub use query::BranchFilter;
