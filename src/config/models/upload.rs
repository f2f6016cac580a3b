//! Engine tuning: concurrency, rate, chunking, retries, control polling

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upload engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadSettings {
    /// Bound on parallel in-flight requests (W)
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
    /// Cap on the aggregate call rate (R)
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    /// Items per checkpoint
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Maximum attempts per item
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Pause re-check cadence in milliseconds
    #[serde(default = "default_control_poll_interval_ms")]
    pub control_poll_interval_ms: u64,
    /// Status code the endpoint returns on success
    #[serde(default = "default_success_status")]
    pub success_status: u16,
    /// Status code the endpoint returns when throttling
    #[serde(default = "default_throttle_status")]
    pub throttle_status: u16,
    /// Response bodies kept on an outcome are truncated to this many characters
    #[serde(default = "default_max_response_chars")]
    pub max_response_chars: usize,
    /// Procurement batch id stamped on every payload, if set
    #[serde(default)]
    pub procurement_batch_id: Option<String>,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            requests_per_second: default_requests_per_second(),
            chunk_size: default_chunk_size(),
            max_retries: default_max_retries(),
            control_poll_interval_ms: default_control_poll_interval_ms(),
            success_status: default_success_status(),
            throttle_status: default_throttle_status(),
            max_response_chars: default_max_response_chars(),
            procurement_batch_id: None,
        }
    }
}

impl UploadSettings {
    /// Base retry delay, `1/R` seconds
    pub fn base_delay(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.requests_per_second.max(1)))
    }

    /// Pause re-check cadence
    pub fn control_poll_interval(&self) -> Duration {
        Duration::from_millis(self.control_poll_interval_ms)
    }
}
