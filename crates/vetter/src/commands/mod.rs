pub mod query;
pub mod scan;

use std::path::PathBuf;

use vetter_analyzers::{Analyzer, ExceptionSet, ExpressionFilterAnalyzer, ExpressionSuiteAnalyzer};
use vetter_reports::{ConsoleReporter, MarkdownReporter, Reporter, SummaryReporter};

/// The console reporter is always on (§6 Added); summary and markdown are
/// opt-in.
pub fn build_reporters(report_summary: bool, report_markdown: Option<&PathBuf>) -> Vec<Box<dyn Reporter>> {
    let mut reporters: Vec<Box<dyn Reporter>> = vec![Box::new(ConsoleReporter::new())];
    if report_summary {
        reporters.push(Box::new(SummaryReporter::new()));
    }
    if let Some(path) = report_markdown {
        reporters.push(Box::new(MarkdownReporter::new(path.clone())));
    }
    reporters
}

/// Builds the single policy analyzer named by `--filter`/`--filter-suite`,
/// if either was given. Both are mutually exclusive at the CLI layer.
pub fn build_filter_analyzers(
    filter: Option<&str>,
    filter_suite: Option<&PathBuf>,
    fail_on_match: bool,
    max_programs: usize,
) -> anyhow::Result<Vec<Box<dyn Analyzer>>> {
    let mut analyzers: Vec<Box<dyn Analyzer>> = Vec::new();
    if let Some(path) = filter_suite {
        analyzers.push(Box::new(ExpressionSuiteAnalyzer::from_path_with_max_programs(
            path,
            fail_on_match,
            max_programs,
        )?));
    } else if let Some(expr) = filter {
        analyzers.push(Box::new(ExpressionFilterAnalyzer::with_max_programs(
            "filter",
            expr,
            fail_on_match,
            max_programs,
        )?));
    }
    Ok(analyzers)
}

pub fn load_exceptions(path: Option<&PathBuf>) -> anyhow::Result<ExceptionSet> {
    match path {
        Some(path) => Ok(ExceptionSet::load(path)?),
        None => Ok(ExceptionSet::empty()),
    }
}
