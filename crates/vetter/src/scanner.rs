//! The scanner driver: wires a [`Reader`] through enrichment, the
//! Analyzer Chain and the Reporter fan-out, and reports the final
//! pass/fail [`Verdict`] (§2, §4, §5).

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use vetter_analyzers::{Analyzer, AnalyzerContext, ExceptionSet, Verdict};
use vetter_core::{Manifest, Package};
use vetter_insights::{run_enrichment, Cancellation, EnricherConfig, InsightCache, InsightsClient};
use vetter_readers::{Flow, Reader};
use vetter_reports::{FinishContext, Reporter};

/// What a completed scan reports back to the CLI layer for exit-code
/// translation.
pub struct ScanOutcome {
    pub verdict_failed: bool,
    pub packages_scanned: usize,
    pub manifests_scanned: usize,
}

pub struct Scanner {
    analyzers: Vec<Box<dyn Analyzer>>,
    reporters: Vec<Box<dyn Reporter>>,
    verdict: Verdict,
    exceptions: ExceptionSet,
}

fn manifest_stub(package: &Package) -> Manifest {
    Manifest::new(package.manifest.kind, package.manifest.path.clone())
}

impl Scanner {
    pub fn new(
        analyzers: Vec<Box<dyn Analyzer>>,
        reporters: Vec<Box<dyn Reporter>>,
        exceptions: ExceptionSet,
    ) -> Self {
        Self {
            analyzers,
            reporters,
            verdict: Verdict::new(),
            exceptions,
        }
    }

    fn process_one(&mut self, manifest: &Manifest, package: &Package, today: NaiveDate) -> anyhow::Result<()> {
        let mut ctx = AnalyzerContext::new(&self.verdict, &self.exceptions, today);
        for analyzer in &mut self.analyzers {
            analyzer
                .on_package(manifest, package, &mut ctx)
                .map_err(|source| anyhow::anyhow!("analyzer {} failed: {source}", analyzer.name()))?;
        }

        let events = ctx.take_events();
        for reporter in &mut self.reporters {
            reporter.on_package(manifest, package);
            for event in &events {
                reporter.on_filter_match(event);
            }
        }
        Ok(())
    }

    fn finish(&mut self, manifests_scanned: usize, packages_scanned: usize, cancelled: bool) -> anyhow::Result<()> {
        for analyzer in &mut self.analyzers {
            let mut ctx = AnalyzerContext::new(&self.verdict, &self.exceptions, chrono_today());
            analyzer
                .on_finish(&mut ctx)
                .map_err(|source| anyhow::anyhow!("analyzer {} failed on finish: {source}", analyzer.name()))?;
            let events = ctx.take_events();
            for reporter in &mut self.reporters {
                for event in &events {
                    reporter.on_filter_match(event);
                }
            }
        }

        let finish_ctx = FinishContext {
            manifests_scanned,
            packages_scanned,
            cancelled,
        };
        for reporter in &mut self.reporters {
            reporter.on_finish(&finish_ctx)?;
        }
        Ok(())
    }

    pub fn verdict_failed(&self) -> bool {
        self.verdict.failed()
    }

    fn handle_enriched(
        &mut self,
        package: Package,
        today: NaiveDate,
        manifests_scanned: &mut HashSet<PathBuf>,
        packages_scanned: &mut usize,
        dump_manifests: &mut HashMap<PathBuf, Manifest>,
        json_dump_dir: Option<&Path>,
    ) -> anyhow::Result<()> {
        let manifest = manifest_stub(&package);
        manifests_scanned.insert(manifest.path.clone());
        self.process_one(&manifest, &package, today)?;
        *packages_scanned += 1;

        if json_dump_dir.is_some() {
            dump_manifests
                .entry(package.manifest.path.clone())
                .or_insert_with(|| manifest.clone())
                .packages
                .push(package);
        }
        Ok(())
    }

    /// Runs the full pipeline: reads `reader` synchronously into memory,
    /// fans the result through bounded concurrent enrichment, then drives
    /// every enriched package through the analyzer/reporter chain as it
    /// arrives. If `json_dump_dir` is set, every enriched package is also
    /// buffered and written as an NDJSON dump once the run completes.
    ///
    /// `cancellation` is the SIGINT signal (§5): once observed, the reader
    /// stops emitting new packages and enrichment aborts its in-flight
    /// requests, but every package already sitting in the enrichment
    /// output channel is still drained through the analyzer/reporter chain
    /// before `on_finish` fires with `cancelled: true`.
    pub async fn scan_with_enrichment(
        &mut self,
        reader: &dyn Reader,
        client: Arc<InsightsClient>,
        cache: Arc<InsightCache>,
        enricher_config: EnricherConfig,
        json_dump_dir: Option<&Path>,
        cancellation: Cancellation,
    ) -> anyhow::Result<ScanOutcome> {
        let mut packages = Vec::new();
        reader.enumerate(&mut |_manifest, package| {
            if cancellation.is_cancelled() {
                return Flow::Stop;
            }
            packages.push(package.clone());
            Flow::Continue
        })?;

        let (tx, rx) = tokio::sync::mpsc::channel(enricher_config.concurrency.max(1) * 2);
        let total = packages.len();
        tokio::spawn(async move {
            for package in packages {
                if tx.send(package).await.is_err() {
                    break;
                }
            }
        });

        let mut enriched_rx = run_enrichment(rx, client, cache, enricher_config, cancellation.clone());

        let today = chrono_today();
        let mut manifests_scanned: HashSet<PathBuf> = HashSet::new();
        let mut packages_scanned = 0usize;
        let mut dump_manifests: HashMap<PathBuf, Manifest> = HashMap::new();
        let mut cancelled = false;

        loop {
            tokio::select! {
                biased;

                _ = cancellation.cancelled() => {
                    cancelled = true;
                    break;
                }

                maybe_package = enriched_rx.recv() => {
                    match maybe_package {
                        Some(package) => self.handle_enriched(
                            package,
                            today,
                            &mut manifests_scanned,
                            &mut packages_scanned,
                            &mut dump_manifests,
                            json_dump_dir,
                        )?,
                        None => break,
                    }
                }
            }
        }

        if cancelled {
            while let Ok(package) = enriched_rx.try_recv() {
                self.handle_enriched(
                    package,
                    today,
                    &mut manifests_scanned,
                    &mut packages_scanned,
                    &mut dump_manifests,
                    json_dump_dir,
                )?;
            }
        }

        debug_assert!(packages_scanned <= total);

        if let Some(dir) = json_dump_dir {
            let manifests: Vec<Manifest> = dump_manifests.into_values().collect();
            vetter_readers::dump::write_dump(dir, &manifests)?;
        }

        self.finish(manifests_scanned.len(), packages_scanned, cancelled)?;

        Ok(ScanOutcome {
            verdict_failed: self.verdict_failed(),
            packages_scanned,
            manifests_scanned: manifests_scanned.len(),
        })
    }

    /// Runs the analyzer/reporter chain directly against a dump reader,
    /// bypassing enrichment entirely since a dump already carries each
    /// package's Insight (§4.1). `cancellation` stops the reader from
    /// emitting further packages once observed, per §5.
    pub fn scan_from_dump(&mut self, reader: &dyn Reader, cancellation: &Cancellation) -> anyhow::Result<ScanOutcome> {
        let today = chrono_today();
        let mut manifests_scanned: HashSet<PathBuf> = HashSet::new();
        let mut packages_scanned = 0usize;
        let mut first_error = None;

        reader.enumerate(&mut |manifest, package| {
            if cancellation.is_cancelled() {
                return Flow::Stop;
            }
            manifests_scanned.insert(manifest.path.clone());
            packages_scanned += 1;
            if let Err(error) = self.process_one(manifest, package, today) {
                first_error = Some(error);
                return Flow::Stop;
            }
            Flow::Continue
        })?;

        if let Some(error) = first_error {
            return Err(error);
        }

        self.finish(manifests_scanned.len(), packages_scanned, cancellation.is_cancelled())?;

        Ok(ScanOutcome {
            verdict_failed: self.verdict_failed(),
            packages_scanned,
            manifests_scanned: manifests_scanned.len(),
        })
    }
}

fn chrono_today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}
