//! The process-wide pass/fail verdict: a single atomic flag, initially
//! `false`, flipped to `true` by any `fail_on_match` analyzer whose filter
//! matched at least one package that wasn't suppressed by an exception.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct Verdict {
    failed: AtomicBool,
}

impl Verdict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_failure(&self) {
        self.failed.store(true, Ordering::SeqCst);
    }

    pub fn failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_false_and_latches_true() {
        let verdict = Verdict::new();
        assert!(!verdict.failed());
        verdict.record_failure();
        assert!(verdict.failed());
    }

    #[test]
    fn repeated_failures_stay_latched() {
        let verdict = Verdict::new();
        verdict.record_failure();
        verdict.record_failure();
        assert!(verdict.failed());
    }
}
