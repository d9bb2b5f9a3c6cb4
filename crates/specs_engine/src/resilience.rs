//! Fetcher wrappers: bounded retry with backoff, and a process-wide cap on
//! concurrent outbound requests.

use std::sync::Arc;
use std::time::Duration;

use crawl_logging::crawl_warn;
use tokio::sync::Semaphore;

use crate::fetch::Fetcher;
use crate::{FailureKind, FetchError, FetchedPage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total tries including the first one; 1 disables retrying.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay after the given failed attempt (1-based): doubles each time, capped.
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let factor = 1u32
            .checked_shl(attempt.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.initial_backoff
            .checked_mul(factor)
            .map_or(self.max_backoff, |d| d.min(self.max_backoff))
    }
}

pub struct RetryingFetcher<F> {
    inner: F,
    policy: RetryPolicy,
}

impl<F: Fetcher> RetryingFetcher<F> {
    pub fn new(inner: F, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait::async_trait]
impl<F: Fetcher> Fetcher for RetryingFetcher<F> {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.inner.fetch(url).await {
                Ok(page) => return Ok(page),
                Err(err) if attempt < max_attempts && err.kind.is_retryable() => {
                    let delay = self.policy.backoff_after(attempt);
                    crawl_warn!(
                        "attempt {}/{} for {} failed ({}); retrying in {:?}",
                        attempt,
                        max_attempts,
                        url,
                        err,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Holds a semaphore permit for the duration of each inner fetch.
pub struct LimitedFetcher<F> {
    inner: F,
    permits: Arc<Semaphore>,
}

impl<F: Fetcher> LimitedFetcher<F> {
    pub fn new(inner: F, max_in_flight: usize) -> Self {
        Self {
            inner,
            permits: Arc::new(Semaphore::new(max_in_flight.max(1))),
        }
    }

    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }
}

#[async_trait::async_trait]
impl<F: Fetcher> Fetcher for LimitedFetcher<F> {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        self.inner.fetch(url).await
    }
}
