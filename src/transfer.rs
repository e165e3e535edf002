//! The per-kind transfer functions (spec §4.C) and assumption-accumulation
//! functions (spec §4.D). Pure: every function here takes borrowed
//! predecessor data and returns a new `Range`/expression, with no access
//! to the graph arena. `crate::graph` is what threads these through the
//! vertex's predecessors and installs the result via `set_state`.

use crate::algebra::{self, Predicate};
use crate::expr::ExprAlgebra;
use crate::graph::vertex::BinOp;
use crate::range::Range;

/// Const's transfer is the identity on its own fixed initial state: it has
/// no predecessors, so there is nothing to fold over.
pub fn op_const<E: ExprAlgebra>(current: &Range<E>) -> Range<E> {
    current.clone()
}

/// Phi folds `meet` over its non-bottom predecessor states. More than 8
/// predecessor states short-circuits to `[-inf, +inf]` (spec §4.C, the
/// phi-arity clamp). The empty fold (every predecessor bottom) is bottom.
pub fn op_phi<E: ExprAlgebra>(states: &[Range<E>]) -> Range<E> {
    const PHI_ARITY_CLAMP: usize = 8;
    if states.len() > PHI_ARITY_CLAMP {
        tracing::warn!(
            arity = states.len(),
            "phi arity clamp trip: collapsing to [-inf, +inf]"
        );
        return Range::full();
    }
    states
        .iter()
        .filter(|s| !s.is_bottom())
        .fold(None, |acc, s| {
            Some(match acc {
                None => s.clone(),
                Some(prev) => algebra::meet(&prev, s),
            })
        })
        .unwrap_or(Range::Bottom)
}

/// Sigma is the identity on its incoming value during plain iteration;
/// narrowing (below) is where it actually does work.
pub fn op_sigma<E: ExprAlgebra>(incoming: &Range<E>) -> Range<E> {
    incoming.clone()
}

/// Sigma's narrowing transfer: tighten the incoming range against the
/// bound using the branch predicate, unless either side carries no
/// information (bottom).
pub fn op_sigma_narrow<E: ExprAlgebra>(
    pred: Predicate,
    incoming: &Range<E>,
    bound: &Range<E>,
) -> Range<E> {
    if incoming.is_bottom() || bound.is_bottom() {
        return incoming.clone();
    }
    algebra::narrow_on(pred, incoming, bound)
}

fn may_contain_zero<E: ExprAlgebra>(lo: &E, hi: &E) -> bool {
    let zero = E::of_int(0);
    let definitely_le = |a: &E, b: &E| a.min(b) == *a;
    let definitely_positive = definitely_le(&zero, lo) && zero != *lo;
    let definitely_negative = definitely_le(hi, &zero) && *hi != zero;
    !(definitely_positive || definitely_negative)
}

/// The four corner combinations of an interval binary operator, reduced
/// to `(min, max)`. Returns `None` if any corner's arithmetic is
/// unsupported, in which case the caller collapses to `[-inf, +inf]`.
fn corners<E: ExprAlgebra>(
    op: impl Fn(&E, &E) -> Result<E, crate::expr::ExprError>,
    a_lo: &E,
    a_hi: &E,
    b_lo: &E,
    b_hi: &E,
) -> Option<(E, E)> {
    let p1 = op(a_lo, b_lo).ok()?;
    let p2 = op(a_lo, b_hi).ok()?;
    let p3 = op(a_hi, b_lo).ok()?;
    let p4 = op(a_hi, b_hi).ok()?;
    let lo = p1.min(&p2).min(&p3).min(&p4);
    let hi = p1.max(&p2).max(&p3).max(&p4);
    Some((lo, hi))
}

/// Binop's transfer: sound interval arithmetic per operator, lifted
/// pointwise from the bounds of `l` and `r`. Division whose divisor range
/// may contain zero widens the whole result to `[-inf, +inf]` rather than
/// attempt a per-bound fixup (spec §4.C).
pub fn op_binop<E: ExprAlgebra>(op: BinOp, l: &Range<E>, r: &Range<E>) -> Range<E> {
    let (Range::Interval(l_lo, l_hi), Range::Interval(r_lo, r_hi)) = (l, r) else {
        return Range::Bottom;
    };
    match op {
        BinOp::Add => match (l_lo.add(r_lo), l_hi.add(r_hi)) {
            (Ok(lo), Ok(hi)) => Range::Interval(lo, hi),
            _ => Range::full(),
        },
        BinOp::Sub => match (l_lo.sub(r_hi), l_hi.sub(r_lo)) {
            (Ok(lo), Ok(hi)) => Range::Interval(lo, hi),
            _ => Range::full(),
        },
        BinOp::Mul => corners(E::mul, l_lo, l_hi, r_lo, r_hi)
            .map(|(lo, hi)| Range::Interval(lo, hi))
            .unwrap_or_else(Range::full),
        BinOp::Div => {
            if may_contain_zero(r_lo, r_hi) {
                Range::full()
            } else {
                corners(E::div, l_lo, l_hi, r_lo, r_hi)
                    .map(|(lo, hi)| Range::Interval(lo, hi))
                    .unwrap_or_else(Range::full)
            }
        }
    }
}

/// Const's assumption is always `true` — a literal carries no side
/// condition.
pub fn op_asmp_const<E: ExprAlgebra>() -> E {
    E::true_()
}

/// Phi's assumption rule (spec §4.D): the conjunction of clauses common to
/// every non-bottom predecessor's assumption, plus — once the Phi is
/// known to have had a single dominating initial value — a monotonicity
/// clause for whichever bound the widening pass left unchanged.
pub fn op_asmp_phi<E: ExprAlgebra>(
    self_expr: &E,
    non_bottom: &[(E, E)],
    single_initial_expr: Option<&E>,
    changed: crate::graph::vertex::Changed,
) -> E {
    let mut common: Option<Vec<E>> = None;
    for (_, asmp) in non_bottom {
        let clauses = asmp.conjuncts();
        common = Some(match common {
            None => clauses,
            Some(prev) => prev.into_iter().filter(|c| clauses.contains(c)).collect(),
        });
    }
    let mut asmp = common
        .unwrap_or_default()
        .into_iter()
        .fold(E::true_(), |acc, clause| acc.and(&clause));

    if let Some(v_expr) = single_initial_expr {
        if !changed.lower {
            asmp = asmp.and(&self_expr.ge(v_expr));
        }
        if !changed.upper {
            asmp = asmp.and(&self_expr.le(v_expr));
        }
    }
    asmp
}

/// `self.expr = incoming.expr /\ incoming.asmp /\ bound.asmp` (spec §4.D).
pub fn op_asmp_sigma<E: ExprAlgebra>(
    self_expr: &E,
    incoming_expr: &E,
    incoming_asmp: &E,
    bound_asmp: &E,
) -> E {
    self_expr
        .eq_rel(incoming_expr)
        .and(incoming_asmp)
        .and(bound_asmp)
}

/// `op_asmp_sigma` plus the branch predicate itself, once narrowing has
/// actually applied it.
pub fn op_asmp_sigma_narrow<E: ExprAlgebra>(
    pred: Predicate,
    self_expr: &E,
    incoming_expr: &E,
    incoming_asmp: &E,
    bound_expr: &E,
    bound_asmp: &E,
) -> E {
    let base = op_asmp_sigma(self_expr, incoming_expr, incoming_asmp, bound_asmp);
    let predicate_clause = match pred {
        Predicate::Lt => self_expr.lt(bound_expr),
        Predicate::Le => self_expr.le(bound_expr),
        Predicate::Gt => self_expr.gt(bound_expr),
        Predicate::Ge => self_expr.ge(bound_expr),
    };
    base.and(&predicate_clause)
}

/// `self.expr = op(l.expr, r.expr) /\ l.asmp /\ r.asmp` (spec §4.D). If the
/// expression facade can't evaluate `op(l.expr, r.expr)` (an
/// `ExpressionFault`, spec §7), the equality clause is dropped rather than
/// propagated — the assumption degrades to just the operands' own
/// conditions, never an error.
pub fn op_asmp_binop<E: ExprAlgebra>(
    self_expr: &E,
    op: BinOp,
    l_expr: &E,
    l_asmp: &E,
    r_expr: &E,
    r_asmp: &E,
) -> E {
    let applied = match op {
        BinOp::Add => l_expr.add(r_expr),
        BinOp::Sub => l_expr.sub(r_expr),
        BinOp::Mul => l_expr.mul(r_expr),
        BinOp::Div => l_expr.div(r_expr),
    };
    let base = l_asmp.and(r_asmp);
    match applied {
        Ok(applied) => self_expr.eq_rel(&applied).and(&base),
        Err(_) => {
            tracing::warn!("binop assumption: operand combination unsupported, dropping equality clause");
            base
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::expr::Expression;

    fn iv(lo: i64, hi: i64) -> Range<Expression> {
        Range::new(Expression::of_int(lo), Expression::of_int(hi))
    }

    #[test_case(BinOp::Add, (1, 3), (10, 20), (11, 23); "add")]
    #[test_case(BinOp::Sub, (1, 3), (10, 20), (-19, -7); "sub")]
    #[test_case(BinOp::Mul, (2, 3), (4, 5), (8, 15); "mul of two positive intervals")]
    #[test_case(BinOp::Mul, (-2, 3), (4, 5), (-10, 15); "mul spanning zero on one side")]
    #[test_case(BinOp::Div, (10, 20), (2, 5), (2, 10); "div by a positive interval")]
    fn op_binop_matches_expected_corners(
        op: BinOp,
        l: (i64, i64),
        r: (i64, i64),
        expected: (i64, i64),
    ) {
        let result = op_binop(op, &iv(l.0, l.1), &iv(r.0, r.1));
        assert_eq!(result, iv(expected.0, expected.1));
    }

    #[test]
    fn div_by_an_interval_spanning_zero_widens_to_full_range() {
        let l = iv(1, 10);
        let r = iv(-1, 1);
        assert_eq!(op_binop(BinOp::Div, &l, &r), Range::full());
    }

    #[test]
    fn binop_on_bottom_operand_is_bottom() {
        let l = Range::<Expression>::bottom();
        let r = iv(1, 2);
        assert_eq!(op_binop(BinOp::Add, &l, &r), Range::Bottom);
    }

    #[test]
    fn phi_folds_meet_over_non_bottom_predecessors() {
        let states = vec![iv(0, 5), Range::bottom(), iv(-3, 2)];
        assert_eq!(op_phi(&states), iv(-3, 5));
    }

    #[test]
    fn phi_with_all_bottom_predecessors_is_bottom() {
        let states: Vec<Range<Expression>> = vec![Range::bottom(), Range::bottom()];
        assert_eq!(op_phi(&states), Range::Bottom);
    }

    #[test]
    fn phi_arity_clamp_collapses_to_full_range() {
        let states: Vec<Range<Expression>> = (0..9).map(|n| iv(n, n)).collect();
        assert_eq!(op_phi(&states), Range::full());
    }
}
