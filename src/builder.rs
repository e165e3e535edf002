//! Construction-time ergonomics layer over [`Graph`] (spec §3 "Construction
//! API"). A `Builder` insulates callers from the arena's raw insert
//! methods and runs `freeze` + the solver in one `solve` call.

use crate::algebra::Predicate;
use crate::error::SraResult;
use crate::expr::ExprAlgebra;
use crate::graph::vertex::BinOp;
use crate::graph::{Graph, VertexId};
use crate::solver;

/// Builds an e-SSA constraint graph one vertex at a time, then solves it.
#[derive(Debug, Default)]
pub struct Builder<E: ExprAlgebra> {
    graph: Graph<E>,
}

impl<E: ExprAlgebra> Builder<E> {
    pub fn new() -> Self {
        Builder { graph: Graph::new() }
    }

    /// Inserts a constant leaf bound to `[value, value]`.
    pub fn const_(&mut self, name: impl Into<String>, value: i64) -> SraResult<VertexId> {
        self.graph.insert_const(name, value)
    }

    /// Inserts a leaf with no fixed value, bound to `[-inf, +inf]` from the
    /// start (an unconstrained input).
    pub fn inf(&mut self, name: impl Into<String>) -> SraResult<VertexId> {
        self.graph.insert_inf(name)
    }

    /// Inserts a Phi join point. Add its incoming-value edges with
    /// `add_edge` afterward.
    pub fn phi(&mut self, name: impl Into<String>) -> SraResult<VertexId> {
        self.graph.insert_phi(name)
    }

    /// Inserts a Sigma (branch-refinement) vertex. Must receive exactly two
    /// predecessor edges before `solve`: the incoming value, then the
    /// bound it is compared against.
    pub fn sigma(&mut self, name: impl Into<String>, pred: Predicate) -> SraResult<VertexId> {
        self.graph.insert_sigma(name, pred)
    }

    /// Inserts a binary-operator vertex. Must receive exactly two
    /// predecessor edges before `solve`: the left operand, then the right.
    pub fn binop(&mut self, name: impl Into<String>, op: BinOp) -> SraResult<VertexId> {
        self.graph.insert_binop(name, op)
    }

    /// Adds a predecessor edge `from -> to`. Order matters for sigma (value
    /// then bound) and binop (lhs then rhs) vertices.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId) {
        self.graph.add_edge(from, to);
    }

    pub fn node(&self, name: &str) -> SraResult<VertexId> {
        self.graph.node(name)
    }

    /// Freezes the graph (validating predecessor arity) and runs the
    /// fixed-point solver to completion.
    pub fn solve(&mut self) -> SraResult<&Graph<E>> {
        self.graph.freeze()?;
        solver::run(&mut self.graph);
        Ok(&self.graph)
    }

    /// The underlying graph, for inspection without solving (e.g. in
    /// tests that check arity-validation failure before `solve` runs).
    pub fn graph(&self) -> &Graph<E> {
        &self.graph
    }
}
