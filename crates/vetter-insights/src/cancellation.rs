//! A cooperative cancellation signal shared between the scanner driver and
//! the enrichment pipeline, flipped once at a process boundary (SIGINT) and
//! observed at the suspension points between (§5's cancellation contract).

use std::sync::Arc;

use tokio::sync::watch;

/// Cheap to clone; every clone observes the same underlying flag. Flipping
/// it is a one-way operation for the lifetime of a run — there is no
/// `uncancel`.
#[derive(Clone)]
pub struct Cancellation {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl Cancellation {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self { tx: Arc::new(tx), rx }
    }

    /// Flips the signal. Idempotent.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }

    /// Non-blocking check, safe to call outside an async context.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once [`Self::cancel`] has been called on any clone;
    /// resolves immediately if it already has.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if *rx.borrow() {
            return;
        }
        let _ = rx.changed().await;
    }
}

impl Default for Cancellation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uncancelled() {
        assert!(!Cancellation::new().is_cancelled());
    }

    #[tokio::test]
    async fn cancel_is_observed_by_every_clone() {
        let a = Cancellation::new();
        let b = a.clone();
        assert!(!b.is_cancelled());
        a.cancel();
        assert!(b.is_cancelled());
        b.cancelled().await;
    }

    #[tokio::test]
    async fn cancelled_resolves_immediately_when_already_cancelled() {
        let cancellation = Cancellation::new();
        cancellation.cancel();
        tokio::time::timeout(std::time::Duration::from_millis(50), cancellation.cancelled())
            .await
            .expect("cancelled() must not hang once the flag is already set");
    }
}
