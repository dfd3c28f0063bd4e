//! The Expression Suite analyzer: loads a Filter Suite file, evaluates
//! every group against every package, and emits one `filter_match` per
//! fired group with that group's severity and check type (§4.3).

use std::path::Path;

use vetter_core::{Manifest, Package};
use vetter_eval::FilterSuite;

use crate::analyzer::{Analyzer, AnalyzerContext};
use crate::error::Result;

pub struct ExpressionSuiteAnalyzer {
    suite: FilterSuite,
    fail_on_match: bool,
}

impl ExpressionSuiteAnalyzer {
    pub fn from_path(path: &Path, fail_on_match: bool) -> Result<Self> {
        Self::from_path_with_max_programs(path, fail_on_match, vetter_eval::DEFAULT_MAX_PROGRAMS)
    }

    pub fn from_path_with_max_programs(path: &Path, fail_on_match: bool, max_programs: usize) -> Result<Self> {
        Ok(Self {
            suite: FilterSuite::load_with_limit(path, max_programs)?,
            fail_on_match,
        })
    }

    pub fn from_yaml(yaml: &str, fail_on_match: bool) -> Result<Self> {
        Ok(Self {
            suite: FilterSuite::from_yaml(yaml)?,
            fail_on_match,
        })
    }
}

impl Analyzer for ExpressionSuiteAnalyzer {
    fn name(&self) -> &str {
        "expression_suite"
    }

    fn on_package(&mut self, _manifest: &Manifest, package: &Package, ctx: &mut AnalyzerContext<'_>) -> Result<()> {
        let fact = vetter_eval::project(package);
        for fired in self.suite.evaluate(&fact)? {
            ctx.record_match(
                package,
                &package.key(),
                &fired.group_name,
                Some(fired.severity),
                Some(fired.check),
                self.fail_on_match,
            );
        }
        Ok(())
    }
}
