//! Rate Limiting Implementation
//!
//! A single token bucket shared by every worker caps the aggregate submission
//! rate. Each worker additionally keeps a minimum spacing between its own
//! consecutive requests so released tokens are not re-acquired in a burst.

mod limiter;
mod types;


// Re-export public types
pub use limiter::RateLimiter;
pub use types::{RateLimitSnapshot, RatePermit};
