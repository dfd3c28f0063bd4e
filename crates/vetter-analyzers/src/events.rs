//! Events analyzers emit toward the reporter fan-out. `filter_match` is the
//! only policy-decision event the Analyzer Chain produces (§4.3/§4.5);
//! `on_package`/`on_finish` are scanner-driver-level events reporters also
//! consume directly.

use vetter_core::Package;
use vetter_eval::{CheckType, Severity};

/// One (package, fired filter) result, carrying enough for a reporter to
/// render it without reaching back into the analyzer that produced it.
#[derive(Debug, Clone)]
pub struct FilterMatchEvent {
    pub package: Package,
    pub filter_name: String,
    /// `None` for a bare `--filter` match; suites always set this.
    pub severity: Option<Severity>,
    pub check: Option<CheckType>,
    /// True if an unexpired exception suppressed this match from the
    /// verdict. The event is still emitted for audit purposes per §4.3.
    pub suppressed: bool,
}
