use crate::core::NodeId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("cannot build a graph from an empty commit log")]
    EmptyLog,

    #[error("commit {0} is already part of the graph")]
    DuplicateCommit(String),

    #[error("fragment {up}..{down} is already hidden")]
    AlreadyHidden { up: NodeId, down: NodeId },

    #[error("no hidden fragment between {up} and {down}")]
    NotHidden { up: NodeId, down: NodeId },

    #[error("fragment boundary {0} is inside another hidden fragment")]
    HiddenBoundary(NodeId),

    #[error("fragment {up}..{down} overlaps a fragment hidden after it was found")]
    StaleFragment { up: NodeId, down: NodeId },
}

pub type Result<T> = std::result::Result<T, GraphError>;
