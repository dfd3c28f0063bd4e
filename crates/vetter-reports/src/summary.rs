//! The Summary reporter: an aggregate table of risk categories — critical
//! vulnerabilities, packages without enrichment data ("outdated" insight),
//! low-popularity source projects, and license concerns — printed once on
//! finish (§4.5).
//!
//! Each package is counted at most once per category, de-duplicated by its
//! `(ecosystem, name, version)` identity so a package pulled in by several
//! manifests doesn't inflate the table.

use std::collections::HashSet;

use vetter_analyzers::FilterMatchEvent;
use vetter_core::{Manifest, Package, PackageKey, RiskLevel};

use crate::reporter::{FinishContext, Reporter};

/// Source projects with fewer stars than this are counted as a
/// low-popularity signal.
const LOW_POPULARITY_STARS: i32 = 10;

/// Licenses considered worth flagging in the summary table. Not a policy
/// decision (that's what filters/suites are for) — just a built-in signal
/// so a plain `scan` without any filter still surfaces something.
const WATCHED_LICENSES: &[&str] = &["GPL-3.0", "AGPL-3.0"];

#[derive(Default)]
pub struct SummaryReporter {
    manifests_seen: HashSet<std::path::PathBuf>,
    seen_keys: HashSet<PackageKey>,
    critical_vulns: usize,
    outdated: usize,
    low_popularity: usize,
    license_concerns: usize,
}

impl SummaryReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reporter for SummaryReporter {
    fn name(&self) -> &str {
        "summary"
    }

    fn on_package(&mut self, manifest: &Manifest, package: &Package) {
        self.manifests_seen.insert(manifest.path.clone());

        let key = package.key();
        if !self.seen_keys.insert(key) {
            return;
        }

        let Some(insight) = &package.insight else {
            self.outdated += 1;
            return;
        };

        if insight
            .vulnerabilities
            .iter()
            .any(|v| v.max_risk() == RiskLevel::Critical)
        {
            self.critical_vulns += 1;
        }

        if insight.projects.iter().any(|p| p.stars < LOW_POPULARITY_STARS) {
            self.low_popularity += 1;
        }

        if insight.licenses.is_empty()
            || insight
                .licenses
                .iter()
                .any(|l| WATCHED_LICENSES.contains(&l.as_str()))
        {
            self.license_concerns += 1;
        }
    }

    fn on_filter_match(&mut self, _event: &FilterMatchEvent) {}

    fn on_finish(&mut self, ctx: &FinishContext) -> anyhow::Result<()> {
        eprintln!("--- summary ---");
        eprintln!("manifests:            {}", self.manifests_seen.len());
        eprintln!("packages:             {}", ctx.packages_scanned);
        eprintln!("critical vulns:       {}", self.critical_vulns);
        eprintln!("no insight data:      {}", self.outdated);
        eprintln!("low-popularity:       {}", self.low_popularity);
        eprintln!("license concerns:     {}", self.license_concerns);
        Ok(())
    }
}
