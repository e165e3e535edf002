//! End-to-end scenarios run through the public `Builder` surface, each
//! exercising one shape of the solver (plain meet, a sigma-bounded loop,
//! an unbounded loop, standalone narrowing, and binop propagation).

use essa_range_analysis::{BinOp, Builder, Expression, Predicate, Range};

mod common;

fn int(n: i64) -> Expression {
    Expression::of_int(n)
}

#[test]
fn two_constants_meet_at_a_phi() {
    let mut b = Builder::<Expression>::new();
    let c1 = b.const_("c1", 3).unwrap();
    let c2 = b.const_("c2", 7).unwrap();
    let p = b.phi("p").unwrap();
    b.add_edge(c1, p);
    b.add_edge(c2, p);

    let graph = b.solve().unwrap();
    assert_eq!(graph.vertex(p).state, Range::new(int(3), int(7)));
    assert_eq!(graph.vertex(p).assumption, Expression::true_());
}

/// `i0 = 0; cap = 10; i = phi(i0, inc); s = sigma(lt)(i, cap); inc = s + 1`
/// (spec §8 scenario 2's exact edge set: the phi loops back through `inc`,
/// and the sigma's incoming value is the phi itself).
#[test]
fn ascending_loop_with_sigma_bound_narrows_below_cap() {
    let mut b = Builder::<Expression>::new();
    let i0 = b.const_("i0", 0).unwrap();
    let one = b.const_("one", 1).unwrap();
    let cap = b.const_("cap", 10).unwrap();
    let i = b.phi("i").unwrap();
    let s = b.sigma("s", Predicate::Lt).unwrap();
    let inc = b.binop("inc", BinOp::Add).unwrap();

    b.add_edge(i0, i);
    b.add_edge(inc, i);
    b.add_edge(i, s);
    b.add_edge(cap, s);
    b.add_edge(s, inc);
    b.add_edge(one, inc);

    let graph = b.solve().unwrap();
    assert_eq!(graph.vertex(s).state, Range::new(int(0), int(9)));
    assert_eq!(graph.vertex(i).state, Range::new(int(0), int(10)));

    let i_expr = graph.vertex(i).expr.clone();
    let i0_expr = graph.vertex(i0).expr.clone();
    assert!(
        graph.vertex(i).assumption.conjuncts().contains(&i_expr.ge(&i0_expr)),
        "phi assumption should record that i never drops below its initial value: {}",
        graph.vertex(i).assumption
    );
}

/// Same loop shape as above but with no sigma: nothing ever tightens the
/// ascending bound, so widening pushes it to `+inf`.
#[test]
fn loop_without_sigma_widens_to_infinity() {
    common::init_tracing();
    let mut b = Builder::<Expression>::new();
    let i0 = b.const_("i0", 0).unwrap();
    let one = b.const_("one", 1).unwrap();
    let i = b.phi("i").unwrap();
    let inc = b.binop("inc", BinOp::Add).unwrap();

    b.add_edge(i0, i);
    b.add_edge(inc, i);
    b.add_edge(i, inc);
    b.add_edge(one, inc);

    let graph = b.solve().unwrap();
    assert_eq!(graph.vertex(i).state, Range::new(int(0), Expression::pos_inf()));
    assert_eq!(graph.vertex(inc).state, Range::new(int(1), Expression::pos_inf()));
}

#[test]
fn narrowing_with_ge_tightens_an_unbounded_leaf() {
    let mut b = Builder::<Expression>::new();
    let x = b.inf("x").unwrap();
    let lo = b.const_("lo", 5).unwrap();
    let s = b.sigma("s", Predicate::Ge).unwrap();
    b.add_edge(x, s);
    b.add_edge(lo, s);

    let graph = b.solve().unwrap();
    assert_eq!(graph.vertex(s).state, Range::new(int(5), Expression::pos_inf()));

    let s_expr = graph.vertex(s).expr.clone();
    let lo_expr = graph.vertex(lo).expr.clone();
    assert!(graph.vertex(s).assumption.conjuncts().contains(&s_expr.ge(&lo_expr)));
}

#[test]
fn binop_propagates_concrete_bounds_and_assumption() {
    let mut b = Builder::<Expression>::new();
    let a = b.const_("a", 2).unwrap();
    let bb = b.const_("b", 3).unwrap();
    let m = b.binop("m", BinOp::Mul).unwrap();
    b.add_edge(a, m);
    b.add_edge(bb, m);

    let graph = b.solve().unwrap();
    assert_eq!(graph.vertex(m).state, Range::new(int(6), int(6)));

    let m_expr = graph.vertex(m).expr.clone();
    assert!(
        graph.vertex(m).assumption.conjuncts().contains(&m_expr.eq_rel(&int(6))),
        "binop assumption should record m's value equation: {}",
        graph.vertex(m).assumption
    );
}

#[test]
fn mul_of_nondegenerate_intervals_uses_sound_corner_arithmetic() {
    let mut b = Builder::<Expression>::new();
    let lo2 = b.const_("lo2", 2).unwrap();
    let lo3 = b.const_("lo3", 3).unwrap();
    let hi4 = b.const_("hi4", 4).unwrap();
    let hi5 = b.const_("hi5", 5).unwrap();
    let lo = b.phi("lo").unwrap();
    let hi = b.phi("hi").unwrap();
    b.add_edge(lo2, lo);
    b.add_edge(lo3, lo);
    b.add_edge(hi4, hi);
    b.add_edge(hi5, hi);
    let m = b.binop("m", BinOp::Mul).unwrap();
    b.add_edge(lo, m);
    b.add_edge(hi, m);

    let graph = b.solve().unwrap();
    assert_eq!(graph.vertex(lo).state, Range::new(int(2), int(3)));
    assert_eq!(graph.vertex(hi).state, Range::new(int(4), int(5)));
    assert_eq!(graph.vertex(m).state, Range::new(int(8), int(15)));
}

#[test]
fn division_whose_divisor_may_be_zero_widens_to_full_range() {
    let mut b = Builder::<Expression>::new();
    let neg = b.const_("neg", -2).unwrap();
    let pos = b.const_("pos", 2).unwrap();
    let divisor = b.phi("divisor").unwrap();
    b.add_edge(neg, divisor);
    b.add_edge(pos, divisor);
    let ten = b.const_("ten", 10).unwrap();
    let d = b.binop("d", BinOp::Div).unwrap();
    b.add_edge(ten, d);
    b.add_edge(divisor, d);

    let graph = b.solve().unwrap();
    assert_eq!(graph.vertex(d).state, Range::full());
}

#[test]
fn phi_with_more_than_eight_predecessors_collapses_to_full_range() {
    let mut b = Builder::<Expression>::new();
    let p = b.phi("p").unwrap();
    for i in 0i64..9 {
        let c = b.const_(format!("c{i}"), i).unwrap();
        b.add_edge(c, p);
    }

    let graph = b.solve().unwrap();
    assert_eq!(graph.vertex(p).state, Range::full());
}

#[test]
fn sigma_with_wrong_predecessor_count_is_a_build_error() {
    let mut b = Builder::<Expression>::new();
    let x = b.inf("x").unwrap();
    let _s = b.sigma("s", Predicate::Lt).unwrap();
    b.add_edge(x, _s);
    assert!(b.solve().is_err());
}

#[test]
fn duplicate_vertex_name_is_rejected() {
    let mut b = Builder::<Expression>::new();
    b.const_("x", 1).unwrap();
    assert!(b.const_("x", 2).is_err());
}

#[test]
fn solving_is_deterministic_and_idempotent_across_runs() {
    fn build_and_solve() -> (Range<Expression>, Range<Expression>) {
        let mut b = Builder::<Expression>::new();
        let i0 = b.const_("i0", 0).unwrap();
        let one = b.const_("one", 1).unwrap();
        let cap = b.const_("cap", 10).unwrap();
        let i = b.phi("i").unwrap();
        let s = b.sigma("s", Predicate::Lt).unwrap();
        let inc = b.binop("inc", BinOp::Add).unwrap();
        b.add_edge(i0, i);
        b.add_edge(inc, i);
        b.add_edge(i, s);
        b.add_edge(cap, s);
        b.add_edge(s, inc);
        b.add_edge(one, inc);
        let graph = b.solve().unwrap();
        (graph.vertex(i).state.clone(), graph.vertex(s).state.clone())
    }

    let first = build_and_solve();
    let second = build_and_solve();
    assert_eq!(first, second);
}
