//! HTTP client for the external insights API.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use vetter_core::{Ecosystem, Insight};

use crate::error::{InsightsError, Result};

const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Enforces a fixed request rate and hands out exponential backoff
/// durations for retried requests. Shared across all enrichment workers
/// behind a single `InsightsClient`.
pub struct RateLimiter {
    last_request: Option<Instant>,
    min_interval: Duration,
    retry_count: u32,
}

impl RateLimiter {
    pub fn new(requests_per_sec: f64) -> Self {
        let min_interval = Duration::from_secs_f64(1.0 / requests_per_sec.max(0.001));
        Self {
            last_request: None,
            min_interval,
            retry_count: 0,
        }
    }

    /// Sleeps just long enough to keep the configured rate, if called again
    /// sooner than `min_interval` after the previous call.
    pub async fn wait_if_needed(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }

    /// `2^retry_count` seconds, capped at 16s, plus up to 250ms of jitter so
    /// concurrently-backed-off workers don't all wake at once.
    pub fn backoff_duration(&self) -> Duration {
        let base = 2_u64.pow(self.retry_count.min(4));
        let jitter_ms = (self.retry_count as u64 * 37) % 250;
        Duration::from_secs(base) + Duration::from_millis(jitter_ms)
    }

    pub fn record_retry(&mut self) {
        self.retry_count += 1;
    }

    pub fn reset_retry_count(&mut self) {
        self.retry_count = 0;
    }
}

/// Async client for the versioned insights HTTPS service
/// (`{base_url}/insights/v1/package`). Constructed once per scan and shared
/// across enrichment workers.
pub struct InsightsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    rate_limiter: Arc<Mutex<RateLimiter>>,
    max_attempts: u32,
}

impl InsightsClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self::with_rate_limit(base_url, api_key, 25.0)
    }

    pub fn with_rate_limit(
        base_url: impl Into<String>,
        api_key: Option<String>,
        requests_per_sec: f64,
    ) -> Self {
        Self::with_retry_policy(base_url, api_key, requests_per_sec, DEFAULT_MAX_ATTEMPTS)
    }

    /// Like [`Self::with_rate_limit`] but with a caller-chosen retry budget,
    /// per the configured `retries` setting rather than the built-in
    /// default.
    pub fn with_retry_policy(
        base_url: impl Into<String>,
        api_key: Option<String>,
        requests_per_sec: f64,
        max_attempts: u32,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(requests_per_sec))),
            max_attempts: max_attempts.max(1),
        }
    }

    /// Fetches the Insight document for one package. Returns `Ok(None)` on
    /// a 404 (no insight available) or on a non-retryable 4xx (soft
    /// failure, already logged); returns `Err` only after transport errors
    /// or 5xx responses have exhausted their retries.
    pub async fn fetch_insight(
        &self,
        ecosystem: &Ecosystem,
        name: &str,
        version: &str,
    ) -> Result<Option<Insight>> {
        let url = format!("{}/insights/v1/package", self.base_url.trim_end_matches('/'));

        for attempt in 1..=self.max_attempts {
            self.rate_limiter.lock().await.wait_if_needed().await;

            let mut request = self.http.get(&url).query(&[
                ("ecosystem", ecosystem.as_str()),
                ("name", name),
                ("version", version),
            ]);
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }

            let response = match request.send().await {
                Ok(r) => r,
                Err(source) => {
                    if attempt == self.max_attempts {
                        return Err(InsightsError::Request(source));
                    }
                    self.back_off(attempt).await;
                    continue;
                }
            };

            let status = response.status();
            if status.is_success() {
                self.rate_limiter.lock().await.reset_retry_count();
                let body = response.bytes().await?;
                let insight: Insight = serde_json::from_slice(&body)?;
                return Ok(Some(insight));
            }
            if status.as_u16() == 404 {
                self.rate_limiter.lock().await.reset_retry_count();
                return Ok(None);
            }
            if status.as_u16() == 429 {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .map(Duration::from_secs);
                match retry_after {
                    Some(wait) => tokio::time::sleep(wait).await,
                    None => self.back_off(attempt).await,
                }
                continue;
            }
            if status.is_server_error() {
                if attempt == self.max_attempts {
                    return Err(InsightsError::Api(format!("server error: {status}")));
                }
                self.back_off(attempt).await;
                continue;
            }

            // any other 4xx: not retried, recorded as a soft failure
            tracing::warn!(ecosystem = %ecosystem, name, version, %status, "insights API rejected request");
            return Ok(None);
        }

        Err(InsightsError::RateLimited)
    }

    async fn back_off(&self, _attempt: u32) {
        let mut limiter = self.rate_limiter.lock().await;
        limiter.record_retry();
        let wait = limiter.backoff_duration();
        drop(limiter);
        tokio::time::sleep(wait).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_duration_grows_and_caps() {
        let mut limiter = RateLimiter::new(25.0);
        let first = limiter.backoff_duration();
        limiter.record_retry();
        let second = limiter.backoff_duration();
        assert!(second >= first);
        for _ in 0..10 {
            limiter.record_retry();
        }
        assert!(limiter.backoff_duration() < Duration::from_secs(17));
    }

    #[test]
    fn reset_retry_count_returns_to_base_backoff() {
        let mut limiter = RateLimiter::new(25.0);
        limiter.record_retry();
        limiter.record_retry();
        limiter.reset_retry_count();
        assert_eq!(limiter.backoff_duration(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_if_needed_spaces_requests_at_configured_rate() {
        let mut limiter = RateLimiter::new(1000.0); // 1ms apart
        let start = Instant::now();
        limiter.wait_if_needed().await;
        limiter.wait_if_needed().await;
        assert!(start.elapsed() >= Duration::from_millis(1));
    }
}
