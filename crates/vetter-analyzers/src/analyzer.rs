//! The Analyzer trait and the context threaded through a scan.
//!
//! Analyzers run sequentially per package in registration order (§4.3).
//! Each analyzer gets a mutable [`AnalyzerContext`] through which it emits
//! `filter_match` events toward the reporter fan-out and records verdict
//! failures; the context itself is owned by the scanner driver and shared
//! by reference across every analyzer for a given package.

use chrono::NaiveDate;
use vetter_core::{Manifest, Package, PackageKey};
use vetter_eval::{CheckType, Severity};

use crate::error::Result;
use crate::events::FilterMatchEvent;
use crate::exceptions::ExceptionSet;
use crate::verdict::Verdict;

/// Threaded through every analyzer invocation for one scan. Holds the
/// shared, process-wide [`Verdict`] and [`ExceptionSet`], and accumulates
/// the `filter_match` events the scanner driver forwards to reporters.
pub struct AnalyzerContext<'a> {
    verdict: &'a Verdict,
    exceptions: &'a ExceptionSet,
    today: NaiveDate,
    events: Vec<FilterMatchEvent>,
}

impl<'a> AnalyzerContext<'a> {
    pub fn new(verdict: &'a Verdict, exceptions: &'a ExceptionSet, today: NaiveDate) -> Self {
        Self {
            verdict,
            exceptions,
            today,
            events: Vec::new(),
        }
    }

    /// Records a filter match. If `fail_on_match` is set and the package's
    /// key is not covered by an unexpired exception, this also fails the
    /// process-wide verdict. The `filter_match` event is always emitted,
    /// even when suppressed, so it remains visible for audit (§4.3).
    pub fn record_match(
        &mut self,
        package: &Package,
        key: &PackageKey,
        filter_name: &str,
        severity: Option<Severity>,
        check: Option<CheckType>,
        fail_on_match: bool,
    ) {
        let suppressed = self.exceptions.suppresses(key, self.today);
        if suppressed {
            tracing::debug!(
                package = %key,
                filter = filter_name,
                "match suppressed by unexpired exception record"
            );
        } else if fail_on_match {
            self.verdict.record_failure();
        }

        self.events.push(FilterMatchEvent {
            package: package.clone(),
            filter_name: filter_name.to_string(),
            severity,
            check,
            suppressed,
        });
    }

    pub fn events(&self) -> &[FilterMatchEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<FilterMatchEvent> {
        std::mem::take(&mut self.events)
    }
}

/// A stage in the Analyzer Chain. `on_package` runs once per enriched
/// package, in registration order; `on_finish` runs exactly once after
/// every package has been through every analyzer.
///
/// A fatal error from either method aborts the scan per §4.3/§7; analyzers
/// that only want to log-and-continue on recoverable failures should do so
/// internally rather than returning `Err`.
pub trait Analyzer: Send {
    fn name(&self) -> &str;

    fn on_package(
        &mut self,
        manifest: &Manifest,
        package: &Package,
        ctx: &mut AnalyzerContext<'_>,
    ) -> Result<()>;

    fn on_finish(&mut self, _ctx: &mut AnalyzerContext<'_>) -> Result<()> {
        Ok(())
    }
}
