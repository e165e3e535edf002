use thiserror::Error;

/// Errors a caller of [`crate::builder::Builder`] and [`crate::graph::Graph`]
/// can observe. These are the only conditions the core ever surfaces:
/// everything else (an oversized symbolic bound, an unsupported ±∞
/// combination) is recovered inside the transfer functions by collapsing to
/// `[-inf, +inf]` rather than reported, so that the analysis stays sound
/// without ever failing a solve. See `transfer` module docs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SraError {
    /// A vertex with this name was already inserted into the graph.
    #[error("a vertex named {0:?} already exists in this graph")]
    DuplicateName(String),

    /// `Builder::node`/`Graph::node` was asked for a name that was never inserted.
    #[error("no vertex named {0:?} in this graph")]
    UnknownName(String),

    /// A sigma vertex did not receive exactly two predecessors
    /// (incoming value, then bound) before `solve` was called.
    #[error("sigma vertex {name:?} must have exactly 2 predecessors (incoming, bound), has {got}")]
    SigmaArity { name: String, got: usize },

    /// A binop vertex did not receive exactly two predecessors (lhs, rhs)
    /// before `solve` was called.
    #[error("binop vertex {name:?} must have exactly 2 predecessors (lhs, rhs), has {got}")]
    BinopArity { name: String, got: usize },

    /// A const or inf vertex (a graph leaf) was given predecessors.
    #[error("const/inf vertex {name:?} cannot have predecessors, has {got}")]
    LeafArity { name: String, got: usize },
}

/// Result alias used throughout the public API.
pub type SraResult<T> = Result<T, SraError>;
