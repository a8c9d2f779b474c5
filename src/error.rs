//! Error values for the graph and algebra layers.
//!
//! Every failure mode in this crate is a value, never a panic or an
//! exception: a filter that fails during path finding marks its path dead
//! instead of aborting the search, and callers are expected to match on
//! [`GraphError`] rather than unwind past it.

use thiserror::Error;

use crate::ids::NodeId;

/// The error type shared by the graph engine, the literal/unit algebra, and
/// the path finder.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GraphError {
    #[error("node {0} is already bound to a graph")]
    NodeAlreadyBound(NodeId),

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("source node {0} not in graph")]
    SourceNodeNotInGraph(NodeId),

    #[error("target node {0} not in graph")]
    TargetNodeNotInGraph(NodeId),

    #[error("composition edge would break the composition forest")]
    CompositionCycle,

    #[error("value is not a singleton")]
    NotSingleton,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid interval: min {min} > max {max}")]
    InvalidInterval { min: f64, max: f64 },

    #[error("units are not commensurable")]
    UnitsNotCommensurable,

    #[error("unknown serialized type tag: {0}")]
    InvalidSerializedType(String),

    #[error("operator applied to mismatched literal kinds")]
    IncompatibleTypes,

    #[error("unknown type identifier: {0}")]
    UnknownType(String),

    #[error("callback error: {0}")]
    CallbackError(Box<GraphError>),

    #[error("out of memory")]
    OutOfMemory,
}

/// Result type used throughout the crate.
pub type GraphResult<T> = Result<T, GraphError>;
