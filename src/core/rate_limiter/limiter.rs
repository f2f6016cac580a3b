//! Core rate limiter implementation

use super::types::{RateLimitSnapshot, RatePermit, TokenBucket};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::trace;

/// Token bucket limiter shared by all workers of a run
///
/// Waiters are served in arrival order: the bucket lock is fair and is held
/// while the head waiter sleeps for its token.
#[derive(Debug)]
pub struct RateLimiter {
    /// Bucket state
    bucket: Mutex<TokenBucket>,
    /// Minimum per-worker spacing between consecutive requests
    spacing: Duration,
    /// Configured rate
    requests_per_second: u32,
}

impl RateLimiter {
    /// Create a limiter admitting `requests_per_second` requests per second
    ///
    /// The bucket starts full, so up to `requests_per_second` requests pass
    /// immediately. A rate of zero is treated as one.
    pub fn new(requests_per_second: u32) -> Self {
        let rate = requests_per_second.max(1);
        Self {
            bucket: Mutex::new(TokenBucket::full(rate, Instant::now())),
            spacing: Duration::from_secs_f64(1.0 / f64::from(rate)),
            requests_per_second: rate,
        }
    }

    /// Wait until a token is available and take it
    pub async fn acquire(&self) -> RatePermit {
        let mut bucket = self.bucket.lock().await;
        loop {
            let now = Instant::now();
            match bucket.try_take(now) {
                Ok(()) => return RatePermit::new(now, self.spacing),
                Err(wait) => {
                    trace!("Rate limit reached, next token in {:?}", wait);
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }

    /// Take a token only if one is available right now
    pub fn try_acquire(&self) -> Option<RatePermit> {
        let mut bucket = self.bucket.try_lock().ok()?;
        let now = Instant::now();
        bucket
            .try_take(now)
            .ok()
            .map(|()| RatePermit::new(now, self.spacing))
    }

    /// Minimum spacing each worker keeps between its own requests
    pub fn spacing(&self) -> Duration {
        self.spacing
    }

    /// Configured rate
    pub fn requests_per_second(&self) -> u32 {
        self.requests_per_second
    }

    /// Current bucket state
    pub async fn snapshot(&self) -> RateLimitSnapshot {
        let mut bucket = self.bucket.lock().await;
        bucket.refill(Instant::now());
        RateLimitSnapshot {
            available: bucket.tokens.floor() as u32,
            capacity: bucket.capacity as u32,
            requests_per_second: self.requests_per_second,
        }
    }
}
