//! Pure functions over [`Range`]: the lattice meet, predicate-directed
//! narrowing, and the widening operator. None of these touch the graph —
//! they are the algebra the solver sequences over vertices.

use crate::expr::ExprAlgebra;
use crate::range::Range;

/// The branch predicate a sigma vertex was split on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Predicate {
    Lt,
    Le,
    Gt,
    Ge,
}

/// Least upper bound in the interval lattice. Commutative, associative,
/// idempotent; `meet(x, Bottom) == x`.
pub fn meet<E: ExprAlgebra>(a: &Range<E>, b: &Range<E>) -> Range<E> {
    match (a, b) {
        (Range::Bottom, other) | (other, Range::Bottom) => other.clone(),
        (Range::Interval(a_lo, a_hi), Range::Interval(b_lo, b_hi)) => {
            Range::Interval(a_lo.min(b_lo), a_hi.max(b_hi))
        }
    }
}

/// Tightens `lhs` using the branch fact `lhs op rhs` (spec §4.B). Never
/// widens: the result's interval is always contained in `lhs`'s whenever
/// both operands are concretely comparable.
pub fn narrow_on<E: ExprAlgebra>(op: Predicate, lhs: &Range<E>, rhs: &Range<E>) -> Range<E> {
    let (Range::Interval(lhs_lo, lhs_hi), Range::Interval(rhs_lo, rhs_hi)) = (lhs, rhs) else {
        // Bottom carries no information to narrow against, and there is
        // nothing to tighten if lhs itself is unreachable.
        return lhs.clone();
    };
    let one = E::of_int(1);
    match op {
        Predicate::Lt => match rhs_hi.sub(&one) {
            Ok(bound) => Range::Interval(lhs_lo.clone(), lhs_hi.min(&bound)),
            Err(_) => Range::full(),
        },
        Predicate::Le => Range::Interval(lhs_lo.clone(), lhs_hi.min(rhs_hi)),
        Predicate::Gt => match rhs_lo.add(&one) {
            Ok(bound) => Range::Interval(lhs_lo.max(&bound), lhs_hi.clone()),
            Err(_) => Range::full(),
        },
        Predicate::Ge => Range::Interval(lhs_lo.max(rhs_lo), lhs_hi.clone()),
    }
}

/// The growth-detection widening operator (spec §4.E): jump a bound to its
/// infinite sentinel the first time it is observed to change across an
/// iteration, guaranteeing termination on an SCC regardless of how the
/// underlying values evolve.
pub fn widen<E: ExprAlgebra>(prior: &Range<E>, fresh: Range<E>) -> Range<E> {
    let Range::Interval(prior_lo, prior_hi) = prior else {
        // A vertex with no prior state (still bottom) has nothing to widen
        // against yet; accept the fresh value unchanged.
        return fresh;
    };
    let Range::Interval(fresh_lo, fresh_hi) = fresh else {
        return Range::Bottom;
    };
    let lo = if fresh_lo.is_neg_inf() {
        fresh_lo
    } else if &fresh_lo != prior_lo {
        E::neg_inf()
    } else {
        fresh_lo
    };
    let hi = if fresh_hi.is_pos_inf() {
        fresh_hi
    } else if &fresh_hi != prior_hi {
        E::pos_inf()
    } else {
        fresh_hi
    };
    Range::Interval(lo, hi)
}
