//! Minimum spacing between outbound portal requests.
//!
//! Sedna is a single shared university server. All fetches through one
//! client go through the same spacer, concurrent callers included.

use std::time::Duration;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use tracing::trace;

/// Hands out request slots no closer together than a fixed interval.
pub struct RequestSpacer {
    limiter: Option<DefaultDirectRateLimiter>,
    interval: Duration,
}

impl RequestSpacer {
    /// A zero interval disables spacing.
    pub fn new(interval: Duration) -> Self {
        // Burst of one: each slot is a full interval after the previous one.
        let limiter = Quota::with_period(interval).map(RateLimiter::direct);
        Self { limiter, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until the next slot is free.
    pub async fn acquire(&self) {
        if let Some(limiter) = &self.limiter {
            if limiter.check().is_err() {
                trace!(interval = ?self.interval, "Waiting for request slot");
                limiter.until_ready().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;

    #[tokio::test]
    async fn test_first_request_is_immediate() {
        let spacer = RequestSpacer::new(Duration::from_secs(5));
        let start = Instant::now();
        spacer.acquire().await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_consecutive_requests_are_spaced() {
        let spacer = RequestSpacer::new(Duration::from_millis(100));
        let start = Instant::now();
        for _ in 0..3 {
            spacer.acquire().await;
        }
        assert!(start.elapsed() >= Duration::from_millis(190));
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_the_spacing() {
        let spacer = Arc::new(RequestSpacer::new(Duration::from_millis(100)));
        let start = Instant::now();
        let tasks: Vec<_> = (0..3)
            .map(|_| {
                let spacer = spacer.clone();
                tokio::spawn(async move { spacer.acquire().await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }
        assert!(start.elapsed() >= Duration::from_millis(190));
    }

    #[tokio::test]
    async fn test_zero_interval_disables_spacing() {
        let spacer = RequestSpacer::new(Duration::ZERO);
        let start = Instant::now();
        for _ in 0..50 {
            spacer.acquire().await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
        assert_eq!(spacer.interval(), Duration::ZERO);
    }
}
