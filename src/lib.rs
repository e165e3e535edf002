//! Symbolic range analysis over e-SSA constraint graphs.
//!
//! This crate builds a small dataflow graph of four vertex kinds — `Const`,
//! `Phi`, `Sigma`, `Binop` — wires it with predecessor edges, and runs a
//! fixed-point solver over it: plain iteration inside acyclic stretches,
//! widening to force termination across a strongly-connected component,
//! then a single narrowing pass that tightens sigma vertices against the
//! branch predicates they were split on. Each vertex also accumulates a
//! symbolic *assumption* expression recording the conditions its bound
//! depends on, independent of whether the interval itself is precise.
//!
//! ```
//! use essa_range_analysis::{Builder, Expression};
//!
//! let mut b = Builder::<Expression>::new();
//! let zero = b.const_("zero", 0).unwrap();
//! let ten = b.const_("ten", 10).unwrap();
//! let phi = b.phi("i").unwrap();
//! b.add_edge(zero, phi);
//! b.add_edge(ten, phi);
//! let graph = b.solve().unwrap();
//! assert_eq!(graph.vertex(phi).state.lower(), Some(&Expression::of_int(0)));
//! ```

pub mod algebra;
pub mod builder;
pub mod error;
pub mod expr;
pub mod graph;
pub mod range;
mod solver;
mod transfer;

pub use algebra::Predicate;
pub use builder::Builder;
pub use error::{SraError, SraResult};
pub use expr::{ExprAlgebra, ExprError, Expression};
pub use graph::vertex::BinOp;
pub use graph::{Graph, VertexId, SIZE_CLAMP};
pub use range::Range;
