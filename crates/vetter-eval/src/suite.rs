//! Filter Suites: a file-defined, ordered collection of named filter
//! groups, each tagged with a severity and a check type. All filters run;
//! the highest severity match determines the suite's per-package verdict.

use std::path::Path;

use serde::Deserialize;

use crate::error::EvalError;
use crate::fact::Fact;
use crate::program::{Evaluator, DEFAULT_MAX_PROGRAMS};

/// Severity tag on a filter group. Ordered so the suite's verdict is the
/// maximum across every filter that fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckType {
    License,
    Vulnerability,
    Popularity,
    Malware,
    Other,
}

#[derive(Debug, Deserialize)]
struct FilterGroupSpec {
    name: String,
    #[serde(default)]
    description: String,
    severity: Severity,
    check: CheckType,
    expression: String,
}

#[derive(Debug, Deserialize)]
struct FilterSuiteSpec {
    #[serde(default)]
    name: String,
    groups: Vec<FilterGroupSpec>,
}

struct FilterGroup {
    name: String,
    description: String,
    severity: Severity,
    check: CheckType,
}

/// One (package, fired filter) result: the group's severity and check type
/// are attached so reporters can render a `filter_match` event per §4.5.
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteMatch {
    pub group_name: String,
    pub severity: Severity,
    pub check: CheckType,
}

/// A compiled Filter Suite. Every group's expression is compiled at
/// construction; any compile error fails the whole suite's construction,
/// per §4.3.
pub struct FilterSuite {
    pub name: String,
    groups: Vec<FilterGroup>,
    evaluator: Evaluator,
}

impl FilterSuite {
    pub fn from_yaml(yaml: &str) -> Result<Self, EvalError> {
        Self::from_yaml_with_limit(yaml, DEFAULT_MAX_PROGRAMS)
    }

    /// Like [`Self::from_yaml`] but with a caller-chosen cap on the number
    /// of groups that may be compiled, per the configured `max programs per
    /// evaluator` setting rather than the built-in default.
    pub fn from_yaml_with_limit(yaml: &str, max_programs: usize) -> Result<Self, EvalError> {
        let spec: FilterSuiteSpec = serde_yaml::from_str(yaml)?;
        let mut evaluator = Evaluator::new(max_programs, false);
        let mut groups = Vec::with_capacity(spec.groups.len());

        for group in spec.groups {
            evaluator.add_filter(group.name.clone(), group.expression.clone())?;
            groups.push(FilterGroup {
                name: group.name,
                description: group.description,
                severity: group.severity,
                check: group.check,
            });
        }

        Ok(Self {
            name: spec.name,
            groups,
            evaluator,
        })
    }

    pub fn load(path: &Path) -> Result<Self, EvalError> {
        Self::load_with_limit(path, DEFAULT_MAX_PROGRAMS)
    }

    pub fn load_with_limit(path: &Path, max_programs: usize) -> Result<Self, EvalError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_with_limit(&contents, max_programs)
    }

    pub fn group_description(&self, group_name: &str) -> Option<&str> {
        self.groups
            .iter()
            .find(|g| g.name == group_name)
            .map(|g| g.description.as_str())
    }

    /// Evaluates every filter against `fact`; returns one [`SuiteMatch`]
    /// per fired filter, in group registration order.
    pub fn evaluate(&self, fact: &Fact) -> Result<Vec<SuiteMatch>, EvalError> {
        let fired = self.evaluator.evaluate_all(fact)?;
        Ok(fired
            .into_iter()
            .filter_map(|m| {
                self.groups
                    .iter()
                    .find(|g| g.name == m.filter_name)
                    .map(|g| SuiteMatch {
                        group_name: g.name.clone(),
                        severity: g.severity,
                        check: g.check,
                    })
            })
            .collect())
    }

    /// The suite's verdict for a package: the maximum severity across every
    /// fired filter, or `None` if nothing matched.
    pub fn verdict(&self, fact: &Fact) -> Result<Option<Severity>, EvalError> {
        Ok(self.evaluate(fact)?.into_iter().map(|m| m.severity).max())
    }
}
