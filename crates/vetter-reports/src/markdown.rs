//! The Markdown reporter: accumulates every `filter_match` event over the
//! run and writes them as a Markdown table to the configured path on
//! finish (§4.5). Produces no output at all if the run was cancelled
//! before `on_finish` ran to completion, per §5's cancellation contract.

use std::path::PathBuf;

use vetter_analyzers::FilterMatchEvent;
use vetter_core::{Manifest, Package};

use crate::reporter::{FinishContext, Reporter};

struct Row {
    package: String,
    filter_name: String,
    severity: String,
    suppressed: bool,
}

pub struct MarkdownReporter {
    path: PathBuf,
    rows: Vec<Row>,
}

impl MarkdownReporter {
    pub fn new(path: PathBuf) -> Self {
        Self { path, rows: Vec::new() }
    }

    fn render(&self, ctx: &FinishContext) -> String {
        let mut out = String::new();
        out.push_str("# Vetter scan report\n\n");
        out.push_str(&format!(
            "Scanned {} package(s) across {} manifest(s).\n\n",
            ctx.packages_scanned, ctx.manifests_scanned
        ));

        if self.rows.is_empty() {
            out.push_str("No filter matches.\n");
            return out;
        }

        out.push_str("| Package | Filter | Severity | Suppressed |\n");
        out.push_str("|---|---|---|---|\n");
        for row in &self.rows {
            out.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                row.package, row.filter_name, row.severity, row.suppressed
            ));
        }
        out
    }
}

impl Reporter for MarkdownReporter {
    fn name(&self) -> &str {
        "markdown"
    }

    fn on_package(&mut self, _manifest: &Manifest, _package: &Package) {}

    fn on_filter_match(&mut self, event: &FilterMatchEvent) {
        self.rows.push(Row {
            package: event.package.key().to_string(),
            filter_name: event.filter_name.clone(),
            severity: event
                .severity
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
            suppressed: event.suppressed,
        });
    }

    fn on_finish(&mut self, ctx: &FinishContext) -> anyhow::Result<()> {
        if ctx.cancelled {
            tracing::warn!("scan was cancelled, skipping markdown report");
            return Ok(());
        }
        let rendered = self.render(ctx);
        std::fs::write(&self.path, rendered)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vetter_core::{Ecosystem, ManifestKind, ManifestRef};

    fn event(name: &str) -> FilterMatchEvent {
        FilterMatchEvent {
            package: Package::new(
                Ecosystem::PyPI,
                name,
                "2.0.0",
                ManifestRef::new(ManifestKind::RequirementsTxt, "requirements.txt"),
            ),
            filter_name: "is-critical".to_string(),
            severity: None,
            check: None,
            suppressed: false,
        }
    }

    #[test]
    fn writes_a_row_per_match_and_skips_when_cancelled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");
        let mut reporter = MarkdownReporter::new(path.clone());
        reporter.on_filter_match(&event("django"));

        reporter
            .on_finish(&FinishContext {
                manifests_scanned: 1,
                packages_scanned: 1,
                cancelled: false,
            })
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("django"));
        assert!(contents.contains("is-critical"));
    }

    #[test]
    fn no_matches_renders_a_clean_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");
        let mut reporter = MarkdownReporter::new(path.clone());

        reporter
            .on_finish(&FinishContext {
                manifests_scanned: 1,
                packages_scanned: 1,
                cancelled: false,
            })
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("No filter matches"));
    }

    #[test]
    fn cancelled_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");
        let mut reporter = MarkdownReporter::new(path.clone());
        reporter.on_filter_match(&event("django"));

        reporter
            .on_finish(&FinishContext {
                manifests_scanned: 1,
                packages_scanned: 1,
                cancelled: true,
            })
            .unwrap();

        assert!(!path.exists());
    }
}
