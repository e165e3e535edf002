use crate::algebra::Predicate;
use crate::expr::ExprAlgebra;
use crate::range::Range;

/// An index into [`crate::graph::Graph`]'s vertex arena. Stable for the
/// vertex's lifetime: assigned once, at insertion, and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub(crate) usize);

impl VertexId {
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// The arithmetic operator a `Binop` vertex applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Which of the four vertex kinds this is, plus the data specific to that
/// kind (spec §3 "Vertex variants"). Dispatch on this replaces the
/// source's subclass-per-kind hierarchy (spec §9 "Vertex polymorphism").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VertexKind {
    Const,
    Phi,
    Sigma(Predicate),
    Binop(BinOp),
}

/// Which bounds the most recent `set_state` actually moved. Read by the
/// Phi assumption rule (spec §4.D) and nothing else.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, derive_new::new)]
pub struct Changed {
    pub lower: bool,
    pub upper: bool,
}

/// A single vertex in the constraint graph.
#[derive(Clone, Debug)]
pub struct Vertex<E: ExprAlgebra> {
    pub(crate) id: VertexId,
    pub name: String,
    pub expr: E,
    pub state: Range<E>,
    pub assumption: E,
    pub(crate) preds: Vec<VertexId>,
    pub(crate) changed: Changed,
    pub(crate) kind: VertexKind,
    /// Phi only. `None` until the Phi has been evaluated once; after that,
    /// `Some(Some(id))` if exactly one predecessor was non-bottom at that
    /// first evaluation, `Some(None)` otherwise. Never recomputed after
    /// the first evaluation (spec §3 "remembers ... at first evaluation").
    pub(crate) single_initial_value: Option<Option<VertexId>>,
}

impl<E: ExprAlgebra> Vertex<E> {
    pub fn id(&self) -> VertexId {
        self.id
    }

    pub fn kind(&self) -> VertexKind {
        self.kind
    }

    pub fn predecessors(&self) -> &[VertexId] {
        &self.preds
    }
}
