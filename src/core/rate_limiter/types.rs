//! Rate limiter types and data structures

use std::time::Duration;
use tokio::time::Instant;

/// Token bucket state
#[derive(Debug, Clone)]
pub(super) struct TokenBucket {
    /// Tokens currently available
    pub(super) tokens: f64,
    /// Bucket size, also the startup burst
    pub(super) capacity: f64,
    /// Tokens added per second
    pub(super) refill_per_sec: f64,
    /// Last token refill time
    pub(super) last_refill: Instant,
}

impl TokenBucket {
    /// A full bucket holding `rate` tokens and refilling at `rate` per second
    pub(super) fn full(rate: u32, now: Instant) -> Self {
        let rate = f64::from(rate.max(1));
        Self {
            tokens: rate,
            capacity: rate,
            refill_per_sec: rate,
            last_refill: now,
        }
    }

    /// Refill tokens based on elapsed time
    pub(super) fn refill(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill);
        let new_tokens = elapsed.as_secs_f64() * self.refill_per_sec;
        self.tokens = (self.tokens + new_tokens).min(self.capacity);
        self.last_refill = now;
    }

    /// Take one token, or report how long until one is available
    pub(super) fn try_take(&mut self, now: Instant) -> Result<(), Duration> {
        self.refill(now);
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            Ok(())
        } else {
            Err(Duration::from_secs_f64(
                (1.0 - self.tokens) / self.refill_per_sec,
            ))
        }
    }
}

/// Proof of admission returned by [`super::RateLimiter::acquire`]
#[derive(Debug, Clone, Copy)]
#[must_use = "hold the spacing before issuing the next request"]
pub struct RatePermit {
    acquired_at: Instant,
    spacing: Duration,
}

impl RatePermit {
    pub(super) fn new(acquired_at: Instant, spacing: Duration) -> Self {
        Self {
            acquired_at,
            spacing,
        }
    }

    /// When the token was granted
    pub fn acquired_at(&self) -> Instant {
        self.acquired_at
    }

    /// Earliest instant the holder may issue its next request
    pub fn next_allowed_at(&self) -> Instant {
        self.acquired_at + self.spacing
    }

    /// Sleep until the minimum spacing since acquisition has elapsed
    pub async fn hold_spacing(self) {
        tokio::time::sleep_until(self.next_allowed_at()).await;
    }
}

/// Point-in-time view of the bucket
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitSnapshot {
    /// Whole tokens available right now
    pub available: u32,
    /// Bucket size
    pub capacity: u32,
    /// Refill rate per second
    pub requests_per_second: u32,
}
