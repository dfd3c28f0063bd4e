//! The Expression Filter analyzer: compiles one `--filter` expression at
//! construction and evaluates it against every package's Filter Fact.

use vetter_core::{Manifest, Package};
use vetter_eval::Evaluator;

use crate::analyzer::{Analyzer, AnalyzerContext};
use crate::error::Result;

pub struct ExpressionFilterAnalyzer {
    name: String,
    evaluator: Evaluator,
    fail_on_match: bool,
}

impl ExpressionFilterAnalyzer {
    pub fn new(filter_name: impl Into<String>, expr: impl Into<String>, fail_on_match: bool) -> Result<Self> {
        Self::with_max_programs(filter_name, expr, fail_on_match, vetter_eval::DEFAULT_MAX_PROGRAMS)
    }

    /// Like [`Self::new`] but with a caller-chosen cap on the evaluator's
    /// compiled program count, per the configured `max programs per
    /// evaluator` setting.
    pub fn with_max_programs(
        filter_name: impl Into<String>,
        expr: impl Into<String>,
        fail_on_match: bool,
        max_programs: usize,
    ) -> Result<Self> {
        let name = filter_name.into();
        let mut evaluator = Evaluator::new(max_programs, false);
        evaluator.add_filter(name.clone(), expr)?;
        Ok(Self {
            name,
            evaluator,
            fail_on_match,
        })
    }
}

impl Analyzer for ExpressionFilterAnalyzer {
    fn name(&self) -> &str {
        "expression_filter"
    }

    fn on_package(&mut self, _manifest: &Manifest, package: &Package, ctx: &mut AnalyzerContext<'_>) -> Result<()> {
        let fact = vetter_eval::project(package);
        if let Some(eval_match) = self.evaluator.evaluate(&fact)? {
            ctx.record_match(
                package,
                &package.key(),
                &eval_match.filter_name,
                None,
                None,
                self.fail_on_match,
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{manifest_fixture, package_fixture};
    use chrono::NaiveDate;

    #[test]
    fn matching_package_fails_verdict_when_fail_on_match_is_set() {
        let mut analyzer = ExpressionFilterAnalyzer::new("is-django", "pkg.name == \"django\"", true).unwrap();
        let verdict = crate::verdict::Verdict::new();
        let exceptions = crate::exceptions::ExceptionSet::empty();
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let mut ctx = AnalyzerContext::new(&verdict, &exceptions, today);

        let manifest = manifest_fixture();
        let package = package_fixture("django", "2.0.0");
        analyzer.on_package(&manifest, &package, &mut ctx).unwrap();

        assert!(verdict.failed());
        assert_eq!(ctx.events().len(), 1);
    }

    #[test]
    fn non_matching_package_leaves_verdict_untouched() {
        let mut analyzer = ExpressionFilterAnalyzer::new("is-django", "pkg.name == \"django\"", true).unwrap();
        let verdict = crate::verdict::Verdict::new();
        let exceptions = crate::exceptions::ExceptionSet::empty();
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let mut ctx = AnalyzerContext::new(&verdict, &exceptions, today);

        let manifest = manifest_fixture();
        let package = package_fixture("flask", "1.0.0");
        analyzer.on_package(&manifest, &package, &mut ctx).unwrap();

        assert!(!verdict.failed());
        assert!(ctx.events().is_empty());
    }

    #[test]
    fn construction_fails_on_bad_expression() {
        assert!(ExpressionFilterAnalyzer::new("bad", "pkg.name ==", true).is_err());
    }
}
