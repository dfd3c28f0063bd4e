//! The Console reporter: a human summary of manifests and package counts
//! plus one line per filter match, written to stderr so stdout stays
//! reserved for dump/report output (§6 Added — Logging).

use std::collections::HashSet;

use vetter_analyzers::FilterMatchEvent;
use vetter_core::{Manifest, Package};

use crate::reporter::{FinishContext, Reporter};

#[derive(Default)]
pub struct ConsoleReporter {
    manifests_seen: HashSet<std::path::PathBuf>,
    packages_seen: usize,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reporter for ConsoleReporter {
    fn name(&self) -> &str {
        "console"
    }

    fn on_package(&mut self, manifest: &Manifest, _package: &Package) {
        self.manifests_seen.insert(manifest.path.clone());
        self.packages_seen += 1;
    }

    fn on_filter_match(&mut self, event: &FilterMatchEvent) {
        let suffix = if event.suppressed { " (suppressed by exception)" } else { "" };
        eprintln!(
            "[match] {} -- {}{}",
            event.package.key(),
            event.filter_name,
            suffix
        );
    }

    fn on_finish(&mut self, ctx: &FinishContext) -> anyhow::Result<()> {
        eprintln!(
            "scanned {} package(s) across {} manifest(s){}",
            ctx.packages_scanned,
            ctx.manifests_scanned,
            if ctx.cancelled { " (cancelled)" } else { "" }
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vetter_core::{Ecosystem, ManifestKind, ManifestRef};

    #[test]
    fn counts_distinct_manifests_and_every_package() {
        let mut reporter = ConsoleReporter::new();
        let manifest = Manifest::new(ManifestKind::RequirementsTxt, "requirements.txt");
        let package_a = Package::new(
            Ecosystem::PyPI,
            "django",
            "2.0.0",
            ManifestRef::new(ManifestKind::RequirementsTxt, "requirements.txt"),
        );
        let package_b = Package::new(
            Ecosystem::PyPI,
            "flask",
            "1.0.0",
            ManifestRef::new(ManifestKind::RequirementsTxt, "requirements.txt"),
        );
        reporter.on_package(&manifest, &package_a);
        reporter.on_package(&manifest, &package_b);

        assert_eq!(reporter.manifests_seen.len(), 1);
        assert_eq!(reporter.packages_seen, 2);
    }
}
