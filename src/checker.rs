use crate::brute_force::{self, valuations};
use crate::formula::{variables_of, Expr, Model, UnboundVariableError, Valuation};
use log::{debug, trace, warn};
use std::fmt::{self, Display, Formatter};
use std::iter;

pub const DEFAULT_MAX_MODELS: usize = 10;
pub const DEFAULT_MAX_VARIABLES: usize = 24;

// Past this many variables we still enumerate, but say so
const WARN_VARIABLES: usize = 16;

#[derive(PartialEq, Clone, Debug)]
pub enum SatResult {
    /// The first models in enumeration order; never empty.
    Satisfiable(Vec<Model>),
    Unsatisfiable,
}

impl SatResult {
    pub fn is_satisfiable(&self) -> bool {
        matches!(self, SatResult::Satisfiable(_))
    }

    pub fn models(&self) -> &[Model] {
        match self {
            SatResult::Satisfiable(models) => models,
            SatResult::Unsatisfiable => &[],
        }
    }

    pub fn into_parts(self) -> (bool, Vec<Model>) {
        match self {
            SatResult::Satisfiable(models) => (true, models),
            SatResult::Unsatisfiable => (false, vec![]),
        }
    }
}

/// Answers semantic questions about formulas by trying every valuation of
/// their variables. Cost is exponential in the number of distinct variables,
/// which is why the checker refuses inputs above `max_variables`.
#[derive(Clone, Debug)]
pub struct Checker {
    max_models: usize,
    max_variables: Option<usize>,
}

impl Default for Checker {
    fn default() -> Self {
        Checker {
            max_models: DEFAULT_MAX_MODELS,
            max_variables: Some(DEFAULT_MAX_VARIABLES),
        }
    }
}

impl Checker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap on the models reported by [`Checker::is_satisfiable`]. At least one
    /// model is always kept.
    pub fn max_models(mut self, max_models: usize) -> Self {
        self.max_models = max_models.max(1);
        self
    }

    /// Largest variable count to enumerate, or `None` to only stop at what the
    /// enumerator can count ([`brute_force::MAX_VARIABLES`]).
    pub fn max_variables(mut self, max_variables: Option<usize>) -> Self {
        self.max_variables = max_variables;
        self
    }

    pub fn is_satisfiable(&self, axioms: &[Expr]) -> Result<SatResult, CheckError> {
        let variables = self.variables(axioms)?;

        let mut models = vec![];
        for valuation in valuations(&variables) {
            if holds_all(axioms, &valuation)? {
                trace!("model {:?}", valuation);
                models.push(valuation);
                if models.len() >= self.max_models {
                    break;
                }
            }
        }

        debug!("found {} model(s) for {} axiom(s)", models.len(), axioms.len());
        if models.is_empty() {
            Ok(SatResult::Unsatisfiable)
        } else {
            Ok(SatResult::Satisfiable(models))
        }
    }

    /// Does every model of `axioms` also satisfy `proposition`? Holds
    /// vacuously when the axioms have no model.
    pub fn entails(&self, axioms: &[Expr], proposition: &Expr) -> Result<bool, CheckError> {
        let entailed = self.find_counterexample(axioms, proposition)?.is_none();
        debug!("entailment of {}: {}", proposition, entailed);
        Ok(entailed)
    }

    /// The first valuation in enumeration order under which every axiom holds
    /// and `proposition` does not.
    pub fn find_counterexample(&self, axioms: &[Expr], proposition: &Expr) -> Result<Option<Model>, CheckError> {
        let variables = self.variables(axioms.iter().chain(iter::once(proposition)))?;

        for valuation in valuations(&variables) {
            if holds_all(axioms, &valuation)? && !proposition.evaluate(&valuation)? {
                trace!("counterexample {:?}", valuation);
                return Ok(Some(valuation));
            }
        }
        Ok(None)
    }

    pub fn is_tautology(&self, expr: &Expr) -> Result<bool, CheckError> {
        self.always(expr, true)
    }

    pub fn is_contradiction(&self, expr: &Expr) -> Result<bool, CheckError> {
        self.always(expr, false)
    }

    fn always(&self, expr: &Expr, value: bool) -> Result<bool, CheckError> {
        let variables = self.variables(iter::once(expr))?;

        for valuation in valuations(&variables) {
            if expr.evaluate(&valuation)? != value {
                trace!("{} is {} under {:?}", expr, !value, valuation);
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn variables<'a>(&self, exprs: impl IntoIterator<Item = &'a Expr>) -> Result<Vec<String>, CheckError> {
        let variables = variables_of(exprs);
        debug!("variables: {:?}", variables);

        // the enumerator's own ceiling applies even without a configured one
        let limit = match self.max_variables {
            Some(limit) => limit.min(brute_force::MAX_VARIABLES),
            None => brute_force::MAX_VARIABLES,
        };
        if variables.len() > limit {
            return Err(CheckError::TooManyVariables {
                count: variables.len(),
                limit,
            });
        }
        if variables.len() > WARN_VARIABLES {
            warn!(
                "enumerating 2^{} valuations, this may take a while",
                variables.len()
            );
        }
        Ok(variables)
    }
}

fn holds_all(axioms: &[Expr], valuation: &Valuation) -> Result<bool, UnboundVariableError> {
    for axiom in axioms {
        if !axiom.evaluate(valuation)? {
            return Ok(false);
        }
    }
    Ok(true)
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum CheckError {
    TooManyVariables { count: usize, limit: usize },
    Unbound(UnboundVariableError),
}

impl From<UnboundVariableError> for CheckError {
    fn from(e: UnboundVariableError) -> Self {
        Self::Unbound(e)
    }
}

impl Display for CheckError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        match self {
            CheckError::TooManyVariables { count, limit } => write!(
                f,
                "{} distinct variables exceed the enumeration limit of {}",
                count, limit
            ),
            CheckError::Unbound(e) => Display::fmt(e, f),
        }
    }
}

impl std::error::Error for CheckError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CheckError::TooManyVariables { .. } => None,
            CheckError::Unbound(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::parser::{parse, parse_all};
    use crate::formula::{expr_strategy, v, valuation};
    use proptest::collection::vec;
    use proptest::prelude::*;
    use test_env_log::test;

    fn checker() -> Checker {
        Checker::new()
    }

    #[test]
    fn sat_modus_ponens() {
        let axioms = parse_all(&["A -> B", "A"]).unwrap();
        let result = checker().is_satisfiable(&axioms).unwrap();
        assert_eq!(result, SatResult::Satisfiable(vec![valuation(&[("A", true), ("B", true)])]));
    }

    #[test]
    fn sat_contradiction() {
        let axioms = parse_all(&["A & ~A"]).unwrap();
        let result = checker().is_satisfiable(&axioms).unwrap();
        assert_eq!(result, SatResult::Unsatisfiable);
        assert_eq!(result.into_parts(), (false, vec![]));
    }

    #[test]
    fn sat_models_in_enumeration_order() {
        let axioms = parse_all(&["A | B"]).unwrap();
        let (sat, models) = checker().is_satisfiable(&axioms).unwrap().into_parts();
        assert!(sat);
        assert_eq!(
            models,
            vec![
                valuation(&[("A", true), ("B", false)]),
                valuation(&[("A", false), ("B", true)]),
                valuation(&[("A", true), ("B", true)]),
            ]
        );
    }

    #[test]
    fn sat_max_models() {
        let axioms = parse_all(&["A | B | C"]).unwrap();
        let result = checker().max_models(2).is_satisfiable(&axioms).unwrap();
        assert_eq!(
            result.models(),
            &[
                valuation(&[("A", true), ("B", false), ("C", false)]),
                valuation(&[("A", false), ("B", true), ("C", false)]),
            ]
        );

        let result = checker().max_models(0).is_satisfiable(&axioms).unwrap();
        assert_eq!(result.models().len(), 1);
    }

    #[test]
    fn sat_no_axioms() {
        let result = checker().is_satisfiable(&[]).unwrap();
        assert_eq!(result, SatResult::Satisfiable(vec![Valuation::new()]));
    }

    #[test]
    fn entails_vacuously() {
        let axioms = parse_all(&["P & ~P"]).unwrap();
        let q = parse("Q").unwrap();
        assert!(checker().entails(&axioms, &q).unwrap());
        assert_eq!(checker().find_counterexample(&axioms, &q).unwrap(), None);
    }

    #[test]
    fn entails_without_axioms_is_tautology() {
        let excluded_middle = parse("A | ~A").unwrap();
        assert!(checker().entails(&[], &excluded_middle).unwrap());
        assert_eq!(
            checker().find_counterexample(&[], &v("A")).unwrap(),
            Some(valuation(&[("A", false)]))
        );
    }

    #[test]
    fn counterexample_covers_proposition_variables() {
        let axioms = parse_all(&["A"]).unwrap();
        let prop = parse("A & B").unwrap();
        assert!(!checker().entails(&axioms, &prop).unwrap());
        assert_eq!(
            checker().find_counterexample(&axioms, &prop).unwrap(),
            Some(valuation(&[("A", true), ("B", false)]))
        );
    }

    #[test]
    fn tautology_and_contradiction() {
        let taut = parse("(A -> B) <-> (~B -> ~A)").unwrap();
        assert!(checker().is_tautology(&taut).unwrap());
        assert!(!checker().is_contradiction(&taut).unwrap());

        let contingent = parse("A -> B").unwrap();
        assert!(!checker().is_tautology(&contingent).unwrap());
        assert!(!checker().is_contradiction(&contingent).unwrap());

        let contra = parse("(A <-> B) & (A <-> ~B)").unwrap();
        assert!(checker().is_contradiction(&contra).unwrap());
    }

    #[test]
    fn too_many_variables() {
        let names: Vec<String> = (0..5).map(|i| format!("x{}", i)).collect();
        let expr = parse(&names.join(" | ")).unwrap();
        let limited = checker().max_variables(Some(4));
        assert_eq!(
            limited.is_tautology(&expr),
            Err(CheckError::TooManyVariables { count: 5, limit: 4 })
        );
        assert_eq!(
            limited.is_satisfiable(&[expr.clone()]),
            Err(CheckError::TooManyVariables { count: 5, limit: 4 })
        );
        assert!(!checker().max_variables(None).is_tautology(&expr).unwrap());
    }

    #[test]
    fn too_many_variables_without_configured_limit() {
        let names: Vec<String> = (0..64).map(|i| format!("x{:02}", i)).collect();
        let expr = parse(&names.join(" | ")).unwrap();
        let unlimited = checker().max_variables(None);
        let too_many = CheckError::TooManyVariables { count: 64, limit: 63 };
        assert_eq!(unlimited.is_tautology(&expr), Err(too_many.clone()));
        assert_eq!(unlimited.is_contradiction(&expr), Err(too_many.clone()));
        assert_eq!(unlimited.is_satisfiable(&[expr.clone()]), Err(too_many.clone()));
        assert_eq!(unlimited.find_counterexample(&[], &expr), Err(too_many.clone()));
        assert_eq!(checker().max_variables(Some(100)).entails(&[], &expr), Err(too_many));
    }

    proptest! {
        #[test]
        fn proptest_entails_iff_no_counterexample(axioms in vec(expr_strategy(), 0..3), proposition in expr_strategy()) {
            let entails = checker().entails(&axioms, &proposition).unwrap();
            let counterexample = checker().find_counterexample(&axioms, &proposition).unwrap();
            prop_assert_eq!(entails, counterexample.is_none());
            if let Some(ce) = counterexample {
                for axiom in &axioms {
                    prop_assert!(axiom.evaluate(&ce).unwrap());
                }
                prop_assert!(!proposition.evaluate(&ce).unwrap());
            }
        }

        #[test]
        fn proptest_models_satisfy_axioms(axioms in vec(expr_strategy(), 1..3)) {
            let result = checker().max_models(4).is_satisfiable(&axioms).unwrap();
            prop_assert!(result.models().len() <= 4);
            for model in result.models() {
                for axiom in &axioms {
                    prop_assert!(axiom.evaluate(model).unwrap());
                }
            }
            let all = checker().max_models(usize::MAX).is_satisfiable(&axioms).unwrap();
            prop_assert_eq!(result.models(), &all.models()[..result.models().len()]);
        }

        #[test]
        fn proptest_tautology_is_negated_contradiction(e in expr_strategy()) {
            let negated = Expr::not(e.clone());
            prop_assert_eq!(checker().is_tautology(&e).unwrap(), checker().is_contradiction(&negated).unwrap());
            prop_assert_eq!(
                checker().is_tautology(&e).unwrap(),
                checker().entails(&[], &e).unwrap()
            );
        }
    }
}
