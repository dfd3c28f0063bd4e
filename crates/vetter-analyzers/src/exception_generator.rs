//! The Exception Generator analyzer: accumulates packages matching a
//! filter expression over the run and, at `on_finish`, writes a YAML
//! exception document listing them with the requested expiry date
//! (`query --exceptions-generate`, §4.3/§6).

use std::path::PathBuf;

use chrono::NaiveDate;
use vetter_core::{Manifest, Package};
use vetter_eval::Evaluator;

use crate::analyzer::{Analyzer, AnalyzerContext};
use crate::error::Result;
use crate::exceptions::ExceptionRecord;

pub struct ExceptionGeneratorAnalyzer {
    evaluator: Evaluator,
    out_path: PathBuf,
    expires: NaiveDate,
    matched: Vec<ExceptionRecord>,
}

impl ExceptionGeneratorAnalyzer {
    pub fn new(expr: impl Into<String>, out_path: PathBuf, expires: NaiveDate) -> Result<Self> {
        let mut evaluator = Evaluator::with_defaults();
        evaluator.add_filter("exceptions-generate", expr)?;
        Ok(Self {
            evaluator,
            out_path,
            expires,
            matched: Vec::new(),
        })
    }
}

impl Analyzer for ExceptionGeneratorAnalyzer {
    fn name(&self) -> &str {
        "exception_generator"
    }

    fn on_package(&mut self, _manifest: &Manifest, package: &Package, _ctx: &mut AnalyzerContext<'_>) -> Result<()> {
        let fact = vetter_eval::project(package);
        if self.evaluator.evaluate(&fact)?.is_some() {
            self.matched.push(ExceptionRecord {
                ecosystem: package.ecosystem.as_str().to_string(),
                name: package.name.clone(),
                version: package.version.clone(),
                expires: self.expires,
                reason: None,
            });
        }
        Ok(())
    }

    fn on_finish(&mut self, _ctx: &mut AnalyzerContext<'_>) -> Result<()> {
        crate::exceptions::ExceptionSet::write(&self.out_path, &self.matched)?;
        tracing::info!(
            path = %self.out_path.display(),
            count = self.matched.len(),
            "wrote exceptions document"
        );
        Ok(())
    }
}
