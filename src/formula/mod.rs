pub mod parser;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display, Formatter};
use std::ops::{BitAnd, BitOr, Not};

/// Total assignment of truth values to variable names.
pub type Valuation = BTreeMap<String, bool>;

/// A valuation under which some expression (or set of axioms) is true.
pub type Model = Valuation;

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Expr {
    Var(String),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Implies(Box<Expr>, Box<Expr>),
    Iff(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(name.into())
    }

    pub fn not(operand: Expr) -> Self {
        Expr::Not(Box::new(operand))
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Expr::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Expr::Or(Box::new(left), Box::new(right))
    }

    pub fn implies(left: Expr, right: Expr) -> Self {
        Expr::Implies(Box::new(left), Box::new(right))
    }

    pub fn iff(left: Expr, right: Expr) -> Self {
        Expr::Iff(Box::new(left), Box::new(right))
    }

    /// Evaluate under `valuation`. Both sides of a binary connective are always
    /// visited, so a missing variable is reported even where the other side
    /// would already decide the result.
    pub fn evaluate(&self, valuation: &Valuation) -> Result<bool, UnboundVariableError> {
        Ok(match self {
            Expr::Var(name) => match valuation.get(name) {
                Some(value) => *value,
                None => return Err(UnboundVariableError { name: name.clone() }),
            },
            Expr::Not(x) => !x.evaluate(valuation)?,
            Expr::And(l, r) => {
                let (l, r) = (l.evaluate(valuation)?, r.evaluate(valuation)?);
                l && r
            }
            Expr::Or(l, r) => {
                let (l, r) = (l.evaluate(valuation)?, r.evaluate(valuation)?);
                l || r
            }
            Expr::Implies(l, r) => {
                let (l, r) = (l.evaluate(valuation)?, r.evaluate(valuation)?);
                !l || r
            }
            Expr::Iff(l, r) => l.evaluate(valuation)? == r.evaluate(valuation)?,
        })
    }

    /// Names of all variables in this expression, in lexicographic order.
    pub fn variables(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        match self {
            Expr::Var(name) => {
                names.insert(name.as_str());
            }
            Expr::Not(x) => x.collect_variables(names),
            Expr::And(l, r) | Expr::Or(l, r) | Expr::Implies(l, r) | Expr::Iff(l, r) => {
                l.collect_variables(names);
                r.collect_variables(names);
            }
        }
    }
}

/// Distinct variable names across `exprs`, sorted lexicographically.
///
/// The order doesn't depend on where (or in which expression) a name first
/// shows up, which is what makes enumeration order reproducible.
pub fn variables_of<'a>(exprs: impl IntoIterator<Item = &'a Expr>) -> Vec<String> {
    let mut names = BTreeSet::new();
    for expr in exprs {
        expr.collect_variables(&mut names);
    }
    names.into_iter().map(String::from).collect()
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        match self {
            Expr::Var(name) => f.write_str(name),
            Expr::Not(x) => write!(f, "~{}", x),
            Expr::And(l, r) => write!(f, "({} & {})", l, r),
            Expr::Or(l, r) => write!(f, "({} | {})", l, r),
            Expr::Implies(l, r) => write!(f, "({} -> {})", l, r),
            Expr::Iff(l, r) => write!(f, "({} <-> {})", l, r),
        }
    }
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Self::Output {
        Expr::not(self)
    }
}

impl BitAnd for Expr {
    type Output = Expr;

    fn bitand(self, rhs: Self) -> Self::Output {
        Expr::and(self, rhs)
    }
}

impl BitOr for Expr {
    type Output = Expr;

    fn bitor(self, rhs: Self) -> Self::Output {
        Expr::or(self, rhs)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct UnboundVariableError {
    pub name: String,
}

impl Display for UnboundVariableError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        write!(f, "variable '{}' has no value in the valuation", self.name)
    }
}

impl std::error::Error for UnboundVariableError {}

#[cfg(test)]
pub(crate) fn v(name: &str) -> Expr {
    Expr::var(name)
}

#[cfg(test)]
pub(crate) fn valuation(pairs: &[(&str, bool)]) -> Valuation {
    pairs.iter().map(|(name, value)| (name.to_string(), *value)).collect()
}

#[cfg(test)]
pub(crate) fn expr_strategy() -> impl proptest::strategy::Strategy<Value = Expr> {
    use proptest::prelude::*;

    let leaf = prop_oneof![Just("A"), Just("B"), Just("C"), Just("D")].prop_map(Expr::var);
    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(Expr::not),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Expr::and(l, r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Expr::or(l, r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Expr::implies(l, r)),
            (inner.clone(), inner).prop_map(|(l, r)| Expr::iff(l, r)),
        ]
    })
}
