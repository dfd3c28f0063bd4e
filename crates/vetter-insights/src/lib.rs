//! Enrichment against the external insights API: an async HTTP client with
//! rate limiting and retry/backoff, a single-flight cache, and the bounded
//! concurrent enrichment pipeline built on top of both.

pub mod cache;
pub mod cancellation;
pub mod client;
pub mod enricher;
pub mod error;

pub use cache::InsightCache;
pub use cancellation::Cancellation;
pub use client::{InsightsClient, RateLimiter};
pub use enricher::{run_enrichment, EnricherConfig};
pub use error::{InsightsError, Result};
