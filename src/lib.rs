//! Propositional formulas: parsing, evaluation, and semantic checks
//! (satisfiability, entailment, tautology, contradiction) by enumerating
//! every truth assignment of the variables involved.
//!
//! Enumeration is exponential in the number of distinct variables; see
//! [`Checker::max_variables`].

pub mod brute_force;
pub mod checker;
pub mod formula;

pub use brute_force::{valuations, Valuations};
pub use checker::{CheckError, Checker, SatResult};
pub use formula::parser::{parse, parse_all, parse_reader, tokenize, LoadError, ParseError, Token};
pub use formula::{variables_of, Expr, Model, UnboundVariableError, Valuation};

/// Truth value of `expr` under `valuation`; every variable in `expr` must be bound.
pub fn evaluate(expr: &Expr, valuation: &Valuation) -> Result<bool, UnboundVariableError> {
    expr.evaluate(valuation)
}

/// Satisfiability of `axioms`, reporting up to `max_models` models.
pub fn is_satisfiable(axioms: &[Expr], max_models: usize) -> Result<SatResult, CheckError> {
    Checker::new().max_models(max_models).is_satisfiable(axioms)
}

pub fn entails(axioms: &[Expr], proposition: &Expr) -> Result<bool, CheckError> {
    Checker::new().entails(axioms, proposition)
}

pub fn is_tautology(expr: &Expr) -> Result<bool, CheckError> {
    Checker::new().is_tautology(expr)
}

pub fn is_contradiction(expr: &Expr) -> Result<bool, CheckError> {
    Checker::new().is_contradiction(expr)
}

pub fn find_counterexample(axioms: &[Expr], proposition: &Expr) -> Result<Option<Model>, CheckError> {
    Checker::new().find_counterexample(axioms, proposition)
}
