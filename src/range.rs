//! The interval type every vertex's `state` is carried in.

use crate::expr::ExprAlgebra;

/// A symbolic interval `[lower, upper]`, or the distinguished `Bottom`
/// value standing for "no reaching definition" / data-flow unreachability.
///
/// Represented as a Rust sum type rather than spec.md's in-band sentinel
/// pair (`⊥, ⊥`) — see `DESIGN.md` for why this is the same lattice
/// re-expressed idiomatically.
#[derive(Clone, Debug, PartialEq)]
pub enum Range<E> {
    Bottom,
    Interval(E, E),
}

impl<E: ExprAlgebra> Range<E> {
    pub fn bottom() -> Self {
        Range::Bottom
    }

    pub fn new(lower: E, upper: E) -> Self {
        Range::Interval(lower, upper)
    }

    /// `[n, n]`.
    pub fn point(value: E) -> Self {
        Range::Interval(value.clone(), value)
    }

    /// `[-inf, +inf]`, the top of the interval lattice.
    pub fn full() -> Self {
        Range::Interval(E::neg_inf(), E::pos_inf())
    }

    pub fn is_bottom(&self) -> bool {
        matches!(self, Range::Bottom)
    }

    pub fn lower(&self) -> Option<&E> {
        match self {
            Range::Bottom => None,
            Range::Interval(lo, _) => Some(lo),
        }
    }

    pub fn upper(&self) -> Option<&E> {
        match self {
            Range::Bottom => None,
            Range::Interval(_, hi) => Some(hi),
        }
    }
}

impl<E: ExprAlgebra + std::fmt::Display> std::fmt::Display for Range<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Range::Bottom => write!(f, "⊥"),
            Range::Interval(lo, hi) => write!(f, "[{lo}, {hi}]"),
        }
    }
}
