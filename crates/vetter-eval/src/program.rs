//! The compiled expression program and the evaluator that hosts a bounded
//! set of them.
//!
//! State machine per program: `uncompiled -> compiled -> {evaluable}`.
//! [`FilterProgram::compile`] is the only constructor, so a `FilterProgram`
//! value is always in the `compiled` state; there is no representable
//! "uncompiled program" in this binding, which is the point — compile
//! errors surface at `add_filter` time, not at evaluation time.

use cel_interpreter::{Program, Value};

use crate::error::EvalError;
use crate::fact::Fact;
use crate::value::build_context;

pub const DEFAULT_MAX_PROGRAMS: usize = 50;

pub struct FilterProgram {
    pub name: String,
    pub source: String,
    compiled: Program,
}

impl FilterProgram {
    pub fn compile(name: impl Into<String>, expr: impl Into<String>) -> Result<Self, EvalError> {
        let name = name.into();
        let expr = expr.into();
        let compiled = Program::compile(&expr).map_err(|source| EvalError::Compile {
            name: name.clone(),
            source,
        })?;
        Ok(Self {
            name,
            source: expr,
            compiled,
        })
    }

    /// Evaluates this program against `fact`. `Ok(None)` means the result
    /// was non-boolean or execution failed and `ignore_errors` is set, so
    /// the caller should treat this as "did not match" and move on.
    pub fn evaluate(&self, fact: &Fact, ignore_errors: bool) -> Result<Option<bool>, EvalError> {
        let context = build_context(fact)?;
        match self.compiled.execute(&context) {
            Ok(Value::Bool(result)) => Ok(Some(result)),
            Ok(other) => {
                if ignore_errors {
                    tracing::warn!(filter = %self.name, "expression did not evaluate to a boolean, skipping");
                    Ok(None)
                } else {
                    Err(EvalError::NonBoolean {
                        name: self.name.clone(),
                        actual: format!("{other:?}"),
                    })
                }
            }
            Err(source) => {
                if ignore_errors {
                    tracing::warn!(filter = %self.name, error = %source, "expression evaluation failed, skipping");
                    Ok(None)
                } else {
                    Err(EvalError::Execution {
                        name: self.name.clone(),
                        source,
                    })
                }
            }
        }
    }
}

/// The name of the filter that matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalMatch {
    pub filter_name: String,
}

/// Hosts a bounded set of compiled [`FilterProgram`]s and evaluates them
/// against a [`Fact`]. Safe to evaluate concurrently across threads: once
/// constructed, programs are immutable.
pub struct Evaluator {
    programs: Vec<FilterProgram>,
    max_programs: usize,
    ignore_errors: bool,
}

impl Evaluator {
    pub fn new(max_programs: usize, ignore_errors: bool) -> Self {
        Self {
            programs: Vec::new(),
            max_programs,
            ignore_errors,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_MAX_PROGRAMS, false)
    }

    pub fn add_filter(&mut self, name: impl Into<String>, expr: impl Into<String>) -> Result<(), EvalError> {
        if self.programs.len() >= self.max_programs {
            return Err(EvalError::TooManyPrograms {
                max: self.max_programs,
            });
        }
        self.programs.push(FilterProgram::compile(name, expr)?);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// Runs every registered program in registration order; the first
    /// program whose result is boolean-true yields a match.
    pub fn evaluate(&self, fact: &Fact) -> Result<Option<EvalMatch>, EvalError> {
        for program in &self.programs {
            if let Some(true) = program.evaluate(fact, self.ignore_errors)? {
                return Ok(Some(EvalMatch {
                    filter_name: program.name.clone(),
                }));
            }
        }
        Ok(None)
    }

    /// Runs every registered program and returns every one that matched,
    /// instead of stopping at the first. Used by the Expression Suite
    /// analyzer, which needs every fired filter's severity, not just one.
    pub fn evaluate_all(&self, fact: &Fact) -> Result<Vec<EvalMatch>, EvalError> {
        let mut matches = Vec::new();
        for program in &self.programs {
            if let Some(true) = program.evaluate(fact, self.ignore_errors)? {
                matches.push(EvalMatch {
                    filter_name: program.name.clone(),
                });
            }
        }
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vetter_core::{Ecosystem, ManifestKind, ManifestRef, Package};

    fn fact_for(name: &str) -> Fact {
        let package = Package::new(
            Ecosystem::PyPI,
            name,
            "2.0.0",
            ManifestRef::new(ManifestKind::RequirementsTxt, "requirements.txt"),
        );
        crate::fact::project(&package)
    }

    #[test]
    fn compile_error_surfaces_immediately() {
        let result = FilterProgram::compile("bad", "pkg.name ==");
        assert!(result.is_err());
    }

    #[test]
    fn evaluate_matches_on_pkg_name() {
        let mut evaluator = Evaluator::with_defaults();
        evaluator.add_filter("is-django", "pkg.name == \"django\"").unwrap();
        let result = evaluator.evaluate(&fact_for("django")).unwrap();
        assert_eq!(result.unwrap().filter_name, "is-django");
        assert!(evaluator.evaluate(&fact_for("flask")).unwrap().is_none());
    }

    #[test]
    fn licenses_exists_quantifier_matches() {
        let mut evaluator = Evaluator::with_defaults();
        evaluator
            .add_filter("gpl", "licenses.exists(l, l == \"GPL-3.0\")")
            .unwrap();

        let mut fact = fact_for("left-pad");
        fact.licenses = vec!["GPL-3.0".to_string()];
        assert!(evaluator.evaluate(&fact).unwrap().is_some());

        fact.licenses = vec!["MIT".to_string()];
        assert!(evaluator.evaluate(&fact).unwrap().is_none());
    }

    #[test]
    fn evaluator_rejects_programs_beyond_the_cap() {
        let mut evaluator = Evaluator::new(1, false);
        evaluator.add_filter("first", "true").unwrap();
        let result = evaluator.add_filter("second", "true");
        assert!(matches!(result, Err(EvalError::TooManyPrograms { max: 1 })));
    }

    #[test]
    fn evaluate_all_collects_every_firing_filter() {
        let mut evaluator = Evaluator::with_defaults();
        evaluator.add_filter("always-a", "true").unwrap();
        evaluator.add_filter("always-b", "true").unwrap();
        evaluator.add_filter("never", "false").unwrap();

        let matches = evaluator.evaluate_all(&fact_for("django")).unwrap();
        assert_eq!(matches.len(), 2);
    }
}
