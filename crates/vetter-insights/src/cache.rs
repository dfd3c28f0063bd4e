//! A concurrent, single-flight cache keyed by `(ecosystem, name, version)`.
//!
//! Concurrent lookups for the same key coalesce into one outbound call: the
//! first caller populates the cell, later callers for the same key await
//! that same in-flight future instead of issuing their own request.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};
use vetter_core::{Insight, PackageKey};

use crate::error::Result;

type Slot = Arc<OnceCell<Option<Insight>>>;

#[derive(Default)]
pub struct InsightCache {
    entries: Mutex<HashMap<PackageKey, Slot>>,
}

impl InsightCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached Insight for `key`, or runs `fetch` to populate it.
    /// If another caller is already fetching the same key, this awaits
    /// that call's result instead of issuing a second one.
    pub async fn get_or_fetch<F, Fut>(&self, key: PackageKey, fetch: F) -> Result<Option<Insight>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<Insight>>>,
    {
        let slot = {
            let mut entries = self.entries.lock().await;
            entries.entry(key).or_insert_with(|| Arc::new(OnceCell::new())).clone()
        };

        slot.get_or_try_init(fetch).await.cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}
