//! `vetter query`: re-evaluate policy against a previously written dump,
//! or generate an exceptions document from one (§6).

use chrono::NaiveDate;
use vetter_analyzers::{Analyzer, ExceptionGeneratorAnalyzer, ExceptionSet};
use vetter_insights::Cancellation;
use vetter_readers::dump::DumpReader;

use crate::cli::QueryArgs;
use crate::config::ResolvedConfig;
use crate::scanner::Scanner;

use super::{build_filter_analyzers, build_reporters, load_exceptions};

fn parse_expiry(raw: Option<&str>, today: NaiveDate, window_days: i64) -> anyhow::Result<NaiveDate> {
    match raw {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|source| anyhow::anyhow!("invalid --exceptions-till date {s:?}: {source}")),
        None => Ok(ExceptionSet::default_expiry_with_window(today, window_days)),
    }
}

/// Returns whether the fail-on-match verdict tripped when re-evaluating
/// policy, or `false` unconditionally for an `--exceptions-generate` run
/// (which has no fail-on-match channel, §6 command table). `cancellation`
/// is flipped by the process's SIGINT handler (§5).
pub async fn run(args: QueryArgs, config: &ResolvedConfig, cancellation: Cancellation) -> anyhow::Result<bool> {
    let reader = DumpReader::new(args.from_dump.clone());
    let exceptions = load_exceptions(args.exceptions.as_ref())?;
    let reporters = build_reporters(args.report_summary, args.report_markdown.as_ref());

    if let Some(out_path) = &args.exceptions_generate {
        let today = chrono::Utc::now().date_naive();
        let expires = parse_expiry(args.exceptions_till.as_deref(), today, config.exception_window_days)?;
        let expr = args
            .exceptions_filter
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("--exceptions-generate requires --exceptions-filter"))?;

        let analyzer: Box<dyn Analyzer> = Box::new(ExceptionGeneratorAnalyzer::new(expr, out_path.clone(), expires)?);
        let mut scanner = Scanner::new(vec![analyzer], reporters, exceptions);
        scanner.scan_from_dump(&reader, &cancellation)?;
        return Ok(false);
    }

    let analyzers = build_filter_analyzers(
        args.filter.as_deref(),
        args.filter_suite.as_ref(),
        args.filter_fail,
        config.max_programs,
    )?;
    let mut scanner = Scanner::new(analyzers, reporters, exceptions);
    let outcome = scanner.scan_from_dump(&reader, &cancellation)?;
    Ok(outcome.verdict_failed)
}
