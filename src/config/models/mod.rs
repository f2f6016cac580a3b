//! Configuration data models
//!
//! This module defines all configuration structures used by the uploader.

pub mod endpoint;
pub mod upload;

// Re-export all configuration types
pub use endpoint::*;
pub use upload::*;

/// Default endpoint path for voucher submissions
pub fn default_endpoint_path() -> String {
    "/offers/voucher-benefits".to_string()
}

/// Default request timeout in seconds
pub fn default_timeout_secs() -> u64 {
    30
}

/// Default number of concurrent in-flight requests
pub fn default_max_workers() -> usize {
    3
}

/// Default aggregate request rate
pub fn default_requests_per_second() -> u32 {
    3
}

/// Default checkpoint granularity
pub fn default_chunk_size() -> usize {
    50
}

/// Default maximum attempts per item
pub fn default_max_retries() -> u32 {
    3
}

/// Default pause re-check cadence in milliseconds
pub fn default_control_poll_interval_ms() -> u64 {
    1000
}

pub fn default_success_status() -> u16 {
    200
}

pub fn default_throttle_status() -> u16 {
    429
}

pub fn default_max_response_chars() -> usize {
    4096
}
