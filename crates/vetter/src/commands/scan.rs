//! `vetter scan`: discover manifests, enrich packages and evaluate policy.

use std::sync::Arc;

use vetter_insights::{Cancellation, EnricherConfig, InsightCache, InsightsClient};
use vetter_readers::{DirectoryReader, LockfileReader, Reader};

use crate::cli::ScanArgs;
use crate::config::ResolvedConfig;
use crate::scanner::Scanner;

use super::{build_filter_analyzers, build_reporters, load_exceptions};

/// Runs a scan and returns whether the fail-on-match verdict tripped
/// (exit code 2 at the caller), or an error for configuration/pipeline
/// failures (exit code 1). `cancellation` is flipped by the process's
/// SIGINT handler (§5) and threaded through to the enrichment pipeline
/// and the analyzer/reporter drive loop.
pub async fn run(args: ScanArgs, config: &ResolvedConfig, cancellation: Cancellation) -> anyhow::Result<bool> {
    let reader: Box<dyn Reader> = if let Some(dir) = &args.dir {
        Box::new(DirectoryReader::new(dir.clone()))
    } else if !args.lockfiles.is_empty() {
        Box::new(LockfileReader::new(args.lockfiles.clone()))
    } else {
        Box::new(DirectoryReader::new(".".into()))
    };

    let analyzers = build_filter_analyzers(
        args.filter.as_deref(),
        args.filter_suite.as_ref(),
        args.filter_fail,
        config.max_programs,
    )?;
    let reporters = build_reporters(args.report_summary, args.report_markdown.as_ref());
    let exceptions = load_exceptions(args.exceptions.as_ref())?;

    let client = Arc::new(InsightsClient::with_retry_policy(
        config.base_url.clone(),
        config.api_key.clone(),
        config.rate_limit,
        config.retries,
    ));
    let cache = Arc::new(InsightCache::new());
    let enricher_config = EnricherConfig {
        concurrency: config.concurrency,
    };

    let mut scanner = Scanner::new(analyzers, reporters, exceptions);
    let outcome = scanner
        .scan_with_enrichment(
            reader.as_ref(),
            client,
            cache,
            enricher_config,
            args.json_dump.as_deref(),
            cancellation,
        )
        .await?;

    tracing::info!(
        packages = outcome.packages_scanned,
        manifests = outcome.manifests_scanned,
        failed = outcome.verdict_failed,
        "scan complete"
    );

    Ok(outcome.verdict_failed)
}
