//! Retry decisions for a single item
//!
//! The policy is a pure function of the attempt number and the raw result of
//! that attempt; the worker pool owns the sleeping.

mod policy;
mod types;


pub use policy::RetryPolicy;
pub use types::{OutcomeClass, RawOutcome, RetryConfig, RetryDecision};
