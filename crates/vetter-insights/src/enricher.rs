//! Fans package enrichment out across bounded concurrent workers, with a
//! bounded output channel (capacity `2 * concurrency`) so a slow analyzer
//! chain applies backpressure onto the enrichment stage.

use std::sync::Arc;

use tokio::sync::mpsc::{channel, Receiver};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use vetter_core::Package;

use crate::cache::InsightCache;
use crate::cancellation::Cancellation;
use crate::client::InsightsClient;

pub struct EnricherConfig {
    pub concurrency: usize,
}

impl Default for EnricherConfig {
    fn default() -> Self {
        Self { concurrency: 10 }
    }
}

async fn enrich_one(mut package: Package, client: Arc<InsightsClient>, cache: Arc<InsightCache>) -> Package {
    let key = package.key();
    let ecosystem = package.ecosystem.clone();
    let name = package.name.clone();
    let version = package.version.clone();

    let result = cache
        .get_or_fetch(key, || async move { client.fetch_insight(&ecosystem, &name, &version).await })
        .await;

    match result {
        Ok(Some(insight)) => package.insight = Some(insight),
        Ok(None) => {}
        Err(error) => {
            tracing::warn!(
                ecosystem = %package.ecosystem,
                name = %package.name,
                version = %package.version,
                %error,
                "enrichment failed after retries, package proceeds without an insight"
            );
        }
    }
    package
}

/// Consumes `incoming` and produces an output channel of enriched packages.
/// Ordering across packages is not preserved: packages leave in enrichment
/// completion order, not arrival order, per the enrichment stage's ordering
/// contract.
///
/// `cancellation` is the signal flipped by the scanner driver on SIGINT
/// (§5): once observed, this stops accepting new packages from `incoming`
/// and aborts every in-flight enrichment task rather than waiting on it,
/// per "enrichment workers abandon inflight requests at the next
/// suspension point".
pub fn run_enrichment(
    mut incoming: Receiver<Package>,
    client: Arc<InsightsClient>,
    cache: Arc<InsightCache>,
    config: EnricherConfig,
    cancellation: Cancellation,
) -> Receiver<Package> {
    let (tx, rx) = channel(config.concurrency * 2);
    let semaphore = Arc::new(Semaphore::new(config.concurrency));

    tokio::spawn(async move {
        let mut in_flight = JoinSet::new();

        loop {
            tokio::select! {
                biased;

                _ = cancellation.cancelled() => {
                    in_flight.abort_all();
                    break;
                }

                Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}

                maybe_package = incoming.recv() => {
                    match maybe_package {
                        Some(package) => {
                            let permit = semaphore.clone().acquire_owned().await.expect("semaphore never closed");
                            let client = client.clone();
                            let cache = cache.clone();
                            let tx = tx.clone();
                            in_flight.spawn(async move {
                                let enriched = enrich_one(package, client, cache).await;
                                let _ = tx.send(enriched).await;
                                drop(permit);
                            });
                        }
                        None => break,
                    }
                }
            }
        }

        while in_flight.join_next().await.is_some() {}
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use vetter_core::{Ecosystem, ManifestKind, ManifestRef};

    #[tokio::test]
    async fn enrichment_preserves_package_count_when_api_is_unreachable() {
        let (tx, rx) = channel(4);
        let client = Arc::new(InsightsClient::new("http://127.0.0.1:1", None));
        let cache = Arc::new(InsightCache::new());

        for i in 0..3 {
            let manifest = ManifestRef::new(ManifestKind::RequirementsTxt, "requirements.txt");
            tx.send(Package::new(Ecosystem::PyPI, format!("pkg{i}"), "1.0.0", manifest))
                .await
                .unwrap();
        }
        drop(tx);

        let mut out = run_enrichment(
            rx,
            client,
            cache,
            EnricherConfig { concurrency: 2 },
            Cancellation::new(),
        );
        let mut count = 0;
        while let Some(package) = out.recv().await {
            assert!(package.insight.is_none());
            count += 1;
        }
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn cancellation_stops_the_pipeline_without_hanging() {
        let (tx, rx) = channel(4);
        let client = Arc::new(InsightsClient::new("http://127.0.0.1:1", None));
        let cache = Arc::new(InsightCache::new());
        let cancellation = Cancellation::new();

        let manifest = ManifestRef::new(ManifestKind::RequirementsTxt, "requirements.txt");
        tx.send(Package::new(Ecosystem::PyPI, "pkg0", "1.0.0", manifest))
            .await
            .unwrap();

        cancellation.cancel();
        let mut out = run_enrichment(rx, client, cache, EnricherConfig { concurrency: 2 }, cancellation);

        let drained = tokio::time::timeout(std::time::Duration::from_millis(200), async {
            let mut count = 0;
            while out.recv().await.is_some() {
                count += 1;
            }
            count
        })
        .await
        .expect("cancelled pipeline must close its output channel promptly");
        assert_eq!(drained, 0);
    }
}
