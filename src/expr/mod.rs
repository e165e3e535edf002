//! The symbolic-expression facade the solver depends on.
//!
//! Everything the fixed-point solver needs from "the real symbolic
//! expression engine" is captured by [`ExprAlgebra`]. [`Expression`] is the
//! one concrete implementation this crate ships; the solver, the range
//! algebra and the vertex transfer functions are all generic over any
//! `E: ExprAlgebra`, so a caller with a fuller simplifier (the kind of
//! expression engine this facade stands in for) can plug it in instead.

mod expression;

pub use expression::Expression;

use std::fmt::Debug;
use thiserror::Error;

/// Raised by [`ExprAlgebra`] arithmetic when a combination of operands has
/// no sound symbolic interpretation (e.g. `+inf - +inf`). The solver is the
/// only caller of these operators and always recovers from this by
/// collapsing the affected bound to `[-inf, +inf]`; it is never propagated
/// to a caller of the crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported combination of infinities: {lhs} {op} {rhs}")]
pub struct ExprError {
    pub op: &'static str,
    pub lhs: String,
    pub rhs: String,
}

pub type ExprResult<E> = Result<E, ExprError>;

/// The minimal algebra the solver requires of a symbolic-expression type.
///
/// A real deployment of this analysis plugs in a production simplifier
/// here; this crate's [`Expression`] is a small, self-contained reference
/// implementation sufficient to exercise and test the solver.
pub trait ExprAlgebra: Clone + Debug + PartialEq {
    /// An integer literal.
    fn of_int(n: i64) -> Self;
    /// An uninterpreted named value (a program variable).
    fn of_name(name: impl Into<String>) -> Self;
    /// The `+∞` sentinel.
    fn pos_inf() -> Self;
    /// The `-∞` sentinel.
    fn neg_inf() -> Self;
    /// The boolean literal `true`, used as the identity assumption.
    fn true_() -> Self;

    fn is_pos_inf(&self) -> bool;
    fn is_neg_inf(&self) -> bool;

    /// Symbolic minimum. Collapses to the smaller operand when the
    /// comparison is decidable (both concrete, or one of the ±∞
    /// sentinels); otherwise constructs a new expression node standing for
    /// the unresolved minimum.
    fn min(&self, other: &Self) -> Self;
    /// Symbolic maximum, dual to [`ExprAlgebra::min`].
    fn max(&self, other: &Self) -> Self;

    /// AST node count. The solver uses this to clamp runaway symbolic
    /// growth across fixed-point iterations.
    fn size(&self) -> usize;

    fn add(&self, other: &Self) -> ExprResult<Self>;
    fn sub(&self, other: &Self) -> ExprResult<Self>;
    fn mul(&self, other: &Self) -> ExprResult<Self>;
    fn div(&self, other: &Self) -> ExprResult<Self>;

    /// `self < other`, as a new boolean-valued expression (not a bool).
    fn lt(&self, other: &Self) -> Self;
    fn le(&self, other: &Self) -> Self;
    fn gt(&self, other: &Self) -> Self;
    fn ge(&self, other: &Self) -> Self;
    /// `self == other`, as a new boolean-valued expression (not a bool).
    /// Distinct from `PartialEq::eq`, which compares expression structure.
    fn eq_rel(&self, other: &Self) -> Self;

    /// Boolean conjunction.
    fn and(&self, other: &Self) -> Self;

    /// Flattens a (possibly nested) conjunction into its top-level
    /// conjuncts; a non-conjunction returns a single-element vector
    /// containing itself. Used by the Phi assumption rule (spec §4.D) to
    /// intersect the common clauses of several predecessors' assumptions.
    fn conjuncts(&self) -> Vec<Self>
    where
        Self: Sized;
}
