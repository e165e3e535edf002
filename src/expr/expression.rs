use std::fmt;

use super::{ExprAlgebra, ExprError, ExprResult};

/// A small, self-contained symbolic-scalar implementation of
/// [`ExprAlgebra`]. Good enough to drive and test the solver; a production
/// deployment of this analysis is expected to swap in a fuller simplifier
/// behind the same trait.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expression {
    Int(i64),
    Name(String),
    PosInf,
    NegInf,
    True,
    Add(Box<Expression>, Box<Expression>),
    Sub(Box<Expression>, Box<Expression>),
    Mul(Box<Expression>, Box<Expression>),
    Div(Box<Expression>, Box<Expression>),
    Min(Box<Expression>, Box<Expression>),
    Max(Box<Expression>, Box<Expression>),
    Lt(Box<Expression>, Box<Expression>),
    Le(Box<Expression>, Box<Expression>),
    Gt(Box<Expression>, Box<Expression>),
    Ge(Box<Expression>, Box<Expression>),
    EqRel(Box<Expression>, Box<Expression>),
    And(Box<Expression>, Box<Expression>),
}

fn unsupported(op: &'static str, lhs: &Expression, rhs: &Expression) -> ExprError {
    ExprError {
        op,
        lhs: lhs.to_string(),
        rhs: rhs.to_string(),
    }
}

impl ExprAlgebra for Expression {
    fn of_int(n: i64) -> Self {
        Expression::Int(n)
    }

    fn of_name(name: impl Into<String>) -> Self {
        Expression::Name(name.into())
    }

    fn pos_inf() -> Self {
        Expression::PosInf
    }

    fn neg_inf() -> Self {
        Expression::NegInf
    }

    fn true_() -> Self {
        Expression::True
    }

    fn is_pos_inf(&self) -> bool {
        matches!(self, Expression::PosInf)
    }

    fn is_neg_inf(&self) -> bool {
        matches!(self, Expression::NegInf)
    }

    fn min(&self, other: &Self) -> Self {
        use Expression::{Int, Min, NegInf, PosInf};
        if self == other {
            return self.clone();
        }
        match (self, other) {
            (Int(x), Int(y)) => Int(*x.min(y)),
            (NegInf, _) | (_, NegInf) => NegInf,
            (PosInf, other) => other.clone(),
            (other, PosInf) => other.clone(),
            _ => Min(Box::new(self.clone()), Box::new(other.clone())),
        }
    }

    fn max(&self, other: &Self) -> Self {
        use Expression::{Int, Max, NegInf, PosInf};
        if self == other {
            return self.clone();
        }
        match (self, other) {
            (Int(x), Int(y)) => Int(*x.max(y)),
            (PosInf, _) | (_, PosInf) => PosInf,
            (NegInf, other) => other.clone(),
            (other, NegInf) => other.clone(),
            _ => Max(Box::new(self.clone()), Box::new(other.clone())),
        }
    }

    fn size(&self) -> usize {
        use Expression::*;
        match self {
            Int(_) | Name(_) | PosInf | NegInf | True => 1,
            Add(l, r) | Sub(l, r) | Mul(l, r) | Div(l, r) | Min(l, r) | Max(l, r) | Lt(l, r)
            | Le(l, r) | Gt(l, r) | Ge(l, r) | EqRel(l, r) | And(l, r) => 1 + l.size() + r.size(),
        }
    }

    fn add(&self, other: &Self) -> ExprResult<Self> {
        use Expression::*;
        match (self, other) {
            (Int(x), Int(y)) => Ok(Int(x + y)),
            (PosInf, NegInf) | (NegInf, PosInf) => Err(unsupported("+", self, other)),
            (PosInf, _) | (_, PosInf) => Ok(PosInf),
            (NegInf, _) | (_, NegInf) => Ok(NegInf),
            _ => Ok(Add(Box::new(self.clone()), Box::new(other.clone()))),
        }
    }

    fn sub(&self, other: &Self) -> ExprResult<Self> {
        use Expression::*;
        match (self, other) {
            (Int(x), Int(y)) => Ok(Int(x - y)),
            (PosInf, PosInf) | (NegInf, NegInf) => Err(unsupported("-", self, other)),
            (PosInf, _) => Ok(PosInf),
            (NegInf, _) => Ok(NegInf),
            (_, PosInf) => Ok(NegInf),
            (_, NegInf) => Ok(PosInf),
            _ => Ok(Sub(Box::new(self.clone()), Box::new(other.clone()))),
        }
    }

    fn mul(&self, other: &Self) -> ExprResult<Self> {
        use Expression::*;
        match (self, other) {
            (Int(x), Int(y)) => Ok(Int(x * y)),
            (Int(0), PosInf) | (Int(0), NegInf) | (PosInf, Int(0)) | (NegInf, Int(0)) => {
                Err(unsupported("*", self, other))
            }
            (Int(0), _) | (_, Int(0)) => Ok(Int(0)),
            (Int(x), PosInf) | (PosInf, Int(x)) => Ok(if *x > 0 { PosInf } else { NegInf }),
            (Int(x), NegInf) | (NegInf, Int(x)) => Ok(if *x > 0 { NegInf } else { PosInf }),
            (PosInf, PosInf) | (NegInf, NegInf) => Ok(PosInf),
            (PosInf, NegInf) | (NegInf, PosInf) => Ok(NegInf),
            (PosInf, _) | (NegInf, _) | (_, PosInf) | (_, NegInf) => {
                Err(unsupported("*", self, other))
            }
            _ => Ok(Mul(Box::new(self.clone()), Box::new(other.clone()))),
        }
    }

    fn div(&self, other: &Self) -> ExprResult<Self> {
        use Expression::*;
        match (self, other) {
            (_, Int(0)) => Err(unsupported("/", self, other)),
            (Int(x), Int(y)) => Ok(Int(x / y)),
            (Int(_), PosInf) | (Int(_), NegInf) => Ok(Int(0)),
            (PosInf, Int(y)) => Ok(if *y > 0 { PosInf } else { NegInf }),
            (NegInf, Int(y)) => Ok(if *y > 0 { NegInf } else { PosInf }),
            (PosInf, PosInf) | (PosInf, NegInf) | (NegInf, PosInf) | (NegInf, NegInf) => {
                Err(unsupported("/", self, other))
            }
            (PosInf, _) | (NegInf, _) => Err(unsupported("/", self, other)),
            (_, PosInf) | (_, NegInf) => Ok(Int(0)),
            _ => Ok(Div(Box::new(self.clone()), Box::new(other.clone()))),
        }
    }

    fn lt(&self, other: &Self) -> Self {
        Expression::Lt(Box::new(self.clone()), Box::new(other.clone()))
    }

    fn le(&self, other: &Self) -> Self {
        Expression::Le(Box::new(self.clone()), Box::new(other.clone()))
    }

    fn gt(&self, other: &Self) -> Self {
        Expression::Gt(Box::new(self.clone()), Box::new(other.clone()))
    }

    fn ge(&self, other: &Self) -> Self {
        Expression::Ge(Box::new(self.clone()), Box::new(other.clone()))
    }

    fn eq_rel(&self, other: &Self) -> Self {
        Expression::EqRel(Box::new(self.clone()), Box::new(other.clone()))
    }

    fn and(&self, other: &Self) -> Self {
        match (self, other) {
            (Expression::True, _) => other.clone(),
            (_, Expression::True) => self.clone(),
            _ => Expression::And(Box::new(self.clone()), Box::new(other.clone())),
        }
    }

    fn conjuncts(&self) -> Vec<Self> {
        match self {
            Expression::True => vec![],
            Expression::And(l, r) => {
                let mut out = l.conjuncts();
                out.extend(r.conjuncts());
                out
            }
            _ => vec![self.clone()],
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Int(n) => write!(f, "{n}"),
            Expression::Name(name) => write!(f, "{name}"),
            Expression::PosInf => write!(f, "+inf"),
            Expression::NegInf => write!(f, "-inf"),
            Expression::True => write!(f, "true"),
            Expression::Add(l, r) => write!(f, "({l} + {r})"),
            Expression::Sub(l, r) => write!(f, "({l} - {r})"),
            Expression::Mul(l, r) => write!(f, "({l} * {r})"),
            Expression::Div(l, r) => write!(f, "({l} / {r})"),
            Expression::Min(l, r) => write!(f, "min({l}, {r})"),
            Expression::Max(l, r) => write!(f, "max({l}, {r})"),
            Expression::Lt(l, r) => write!(f, "({l} < {r})"),
            Expression::Le(l, r) => write!(f, "({l} <= {r})"),
            Expression::Gt(l, r) => write!(f, "({l} > {r})"),
            Expression::Ge(l, r) => write!(f, "({l} >= {r})"),
            Expression::EqRel(l, r) => write!(f, "({l} = {r})"),
            Expression::And(l, r) => write!(f, "({l} /\\ {r})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_on_constants() {
        let two = Expression::of_int(2);
        let three = Expression::of_int(3);
        assert_eq!(two.add(&three), Ok(Expression::Int(5)));
        assert_eq!(two.mul(&three), Ok(Expression::Int(6)));
    }

    #[test]
    fn infinities_absorb_finite_values() {
        let x = Expression::of_name("x");
        assert_eq!(Expression::pos_inf().add(&x), Ok(Expression::PosInf));
        assert_eq!(x.add(&Expression::neg_inf()), Ok(Expression::NegInf));
    }

    #[test]
    fn opposite_infinities_are_unsupported() {
        assert!(Expression::pos_inf().add(&Expression::neg_inf()).is_err());
        assert!(Expression::pos_inf().sub(&Expression::pos_inf()).is_err());
    }

    #[test]
    fn division_by_zero_is_unsupported() {
        assert!(Expression::of_int(5).div(&Expression::of_int(0)).is_err());
    }

    #[test]
    fn min_max_resolve_concrete_values() {
        let a = Expression::of_int(3);
        let b = Expression::of_int(7);
        assert_eq!(a.min(&b), Expression::Int(3));
        assert_eq!(a.max(&b), Expression::Int(7));
        assert_eq!(Expression::neg_inf().min(&a), Expression::NegInf);
        assert_eq!(Expression::pos_inf().max(&a), Expression::PosInf);
    }

    #[test]
    fn min_max_of_symbolic_values_stay_unresolved() {
        let x = Expression::of_name("x");
        let y = Expression::of_name("y");
        assert_eq!(
            x.min(&y),
            Expression::Min(Box::new(x.clone()), Box::new(y.clone()))
        );
    }

    #[test]
    fn and_with_true_is_identity() {
        let x = Expression::of_name("x").lt(&Expression::of_int(1));
        assert_eq!(Expression::true_().and(&x), x);
        assert_eq!(x.and(&Expression::true_()), x);
    }

    #[test]
    fn conjuncts_flatten_nested_and() {
        let a = Expression::of_name("a").lt(&Expression::of_int(1));
        let b = Expression::of_name("b").gt(&Expression::of_int(2));
        let c = Expression::of_name("c").ge(&Expression::of_int(3));
        let conj = a.and(&b).and(&c);
        assert_eq!(conj.conjuncts(), vec![a, b, c]);
    }

    #[test]
    fn size_counts_ast_nodes() {
        let e = Expression::of_int(1)
            .add(&Expression::of_int(2))
            .unwrap()
            .add(&Expression::of_int(3))
            .unwrap();
        // constant-folds to a single Int node regardless of shape
        assert_eq!(e.size(), 1);

        let symbolic = Expression::of_name("x")
            .add(&Expression::of_name("y"))
            .unwrap();
        assert_eq!(symbolic.size(), 3); // Add + Name + Name
    }
}
