//! Worker pool implementation

use crate::core::batch::Outcome;
use crate::core::control::{ControlSignal, RunState};
use crate::core::rate_limiter::RateLimiter;
use crate::core::retry::{RetryDecision, RetryPolicy};
use crate::core::submit::Submitter;
use crate::core::voucher::WorkItem;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Runs up to `max_workers` items of a chunk at a time
///
/// The concurrency bound and the request rate are independent: workers
/// spend most of their time waiting on the limiter or on backoff, so `W`
/// may exceed what the rate alone would need.
#[derive(Clone)]
pub struct WorkerPool {
    max_workers: usize,
    limiter: Arc<RateLimiter>,
    policy: RetryPolicy,
    control: Arc<dyn ControlSignal>,
    submitter: Arc<dyn Submitter>,
    max_response_chars: usize,
}

impl WorkerPool {
    /// Create a pool; a concurrency bound of zero is treated as one
    pub fn new(
        max_workers: usize,
        limiter: Arc<RateLimiter>,
        policy: RetryPolicy,
        control: Arc<dyn ControlSignal>,
        submitter: Arc<dyn Submitter>,
    ) -> Self {
        Self {
            max_workers: max_workers.max(1),
            limiter,
            policy,
            control,
            submitter,
            max_response_chars: crate::config::models::default_max_response_chars(),
        }
    }

    /// Limit the response body kept in each outcome
    pub fn with_max_response_chars(mut self, max_response_chars: usize) -> Self {
        self.max_response_chars = max_response_chars;
        self
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Process every item of a chunk
    ///
    /// Slot `i` of the result holds the outcome of `items[i]`, whatever
    /// order the items finish in. `None` marks an item abandoned because the
    /// run was stopped before it could finish.
    pub async fn process_chunk(&self, items: &[WorkItem]) -> Vec<Option<Outcome>> {
        let mut slots: Vec<Option<Outcome>> = vec![None; items.len()];

        let mut completed = stream::iter(items.iter().enumerate())
            .map(|(index, item)| async move { (index, self.process_item(item).await) })
            .buffer_unordered(self.max_workers);

        while let Some((index, outcome)) = completed.next().await {
            slots[index] = outcome;
        }

        slots
    }

    /// Drive one item to a terminal outcome, or abandon it on stop
    pub async fn process_item(&self, item: &WorkItem) -> Option<Outcome> {
        let mut attempt = 0u32;

        loop {
            if !self.admit(item).await {
                return None;
            }

            attempt += 1;
            let permit = self.limiter.acquire().await;
            let raw = self.submitter.submit(item).await;

            match self.policy.decide(attempt, &raw) {
                RetryDecision::Accept => {
                    info!(
                        "Uploaded {} (row {}, attempt {})",
                        item.voucher_code(),
                        item.row,
                        attempt
                    );
                    permit.hold_spacing().await;
                    return Some(Outcome::succeeded(attempt, &raw, self.max_response_chars));
                }
                RetryDecision::RetryAfter(delay) => {
                    debug!(
                        "Attempt {}/{} for {} failed ({}), retrying in {:?}",
                        attempt,
                        self.policy.max_retries(),
                        item.voucher_code(),
                        raw.error_text(),
                        delay
                    );
                    let resume_at = permit.next_allowed_at().max(Instant::now() + delay);
                    tokio::time::sleep_until(resume_at).await;
                }
                RetryDecision::GiveUp => {
                    warn!(
                        "Giving up on {} (row {}) after {} attempts: {}",
                        item.voucher_code(),
                        item.row,
                        attempt,
                        raw.error_text()
                    );
                    permit.hold_spacing().await;
                    return Some(Outcome::failed(attempt, &raw, self.max_response_chars));
                }
            }
        }
    }

    /// Safe point before an attempt; `false` means abandon the item
    async fn admit(&self, item: &WorkItem) -> bool {
        match self.control.poll().await {
            RunState::Running => true,
            RunState::Stopped => {
                debug!("Run stopped, dropping {}", item.voucher_code());
                false
            }
            RunState::Paused => {
                debug!("Run paused, {} waiting", item.voucher_code());
                let resumed = self.control.await_resume_or_stop().await;
                if !resumed {
                    debug!("Run stopped while paused, dropping {}", item.voucher_code());
                }
                resumed
            }
        }
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("max_workers", &self.max_workers)
            .field("limiter", &self.limiter)
            .field("policy", &self.policy)
            .field("max_response_chars", &self.max_response_chars)
            .finish_non_exhaustive()
    }
}
