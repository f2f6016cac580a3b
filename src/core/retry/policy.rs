//! Retry decision table

use super::types::{OutcomeClass, RawOutcome, RetryConfig, RetryDecision};
use std::time::Duration;

/// Maps (attempt, raw outcome) to the next step for an item
///
/// Rules, in order:
/// 1. success status: accept
/// 2. throttle status with budget left: retry after `base * throttle_multiplier`
/// 3. any other status or a transport failure with budget left: retry after
///    `base * backoff_multiplier^(attempt - 1)`
/// 4. otherwise give up
///
/// Throttled attempts draw from the same budget as ordinary failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Create a new retry policy
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    pub fn max_retries(&self) -> u32 {
        self.config.max_retries
    }

    /// Classify a raw outcome against the configured status codes
    pub fn classify(&self, raw: &RawOutcome) -> OutcomeClass {
        match raw.status() {
            Some(status) if status == self.config.success_status => OutcomeClass::Success,
            Some(status) if status == self.config.throttle_status => OutcomeClass::Throttled,
            Some(_) => OutcomeClass::Rejected,
            None => OutcomeClass::Transport,
        }
    }

    /// Decide what to do after `attempt` (1-based) produced `raw`
    pub fn decide(&self, attempt: u32, raw: &RawOutcome) -> RetryDecision {
        let budget_left = attempt < self.config.max_retries;

        match self.classify(raw) {
            OutcomeClass::Success => RetryDecision::Accept,
            OutcomeClass::Throttled if budget_left => {
                RetryDecision::RetryAfter(self.throttle_delay())
            }
            OutcomeClass::Rejected | OutcomeClass::Transport if budget_left => {
                RetryDecision::RetryAfter(self.backoff_for(attempt))
            }
            _ => RetryDecision::GiveUp,
        }
    }

    /// Backoff after the given failed attempt
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16) as i32;
        self.config
            .base_delay
            .mul_f64(self.config.backoff_multiplier.powi(exponent))
    }

    /// Delay after a throttled attempt
    pub fn throttle_delay(&self) -> Duration {
        self.config
            .base_delay
            .mul_f64(self.config.throttle_multiplier)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}
