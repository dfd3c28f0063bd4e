//! The Reporter trait: consumes `on_package` (informational),
//! `on_filter_match` (policy decision) and `on_finish` (terminal) events in
//! pipeline order (§4.5). All registered reporters receive every event;
//! order within a package is deterministic, across packages it is
//! enrichment completion order.

use vetter_analyzers::FilterMatchEvent;
use vetter_core::{Manifest, Package};

/// Passed to `on_finish`. `cancelled` is set when the run was interrupted
/// (§5) — reporters that write files should still flush what they have.
#[derive(Debug, Clone, Copy)]
pub struct FinishContext {
    pub manifests_scanned: usize,
    pub packages_scanned: usize,
    pub cancelled: bool,
}

pub trait Reporter: Send {
    fn name(&self) -> &str;

    fn on_package(&mut self, _manifest: &Manifest, _package: &Package) {}

    fn on_filter_match(&mut self, _event: &FilterMatchEvent) {}

    fn on_finish(&mut self, _ctx: &FinishContext) -> anyhow::Result<()> {
        Ok(())
    }
}
