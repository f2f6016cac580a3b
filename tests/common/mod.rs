//! Common test utilities for voucher-upload
//!
//! - Fixtures for CSV input, run folders and settings
//! - Scripted submitters for driving the engine without a network
//! - Custom assertions

pub mod fixtures;

pub use fixtures::{RunFolderFixture, VoucherFactory};
pub use submitters::ScriptedSubmitter;

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}

/// Most requests admitted in any window of `window` starting at a call
pub fn max_calls_in_window(
    calls: &[tokio::time::Instant],
    window: std::time::Duration,
) -> usize {
    let mut sorted = calls.to_vec();
    sorted.sort();
    sorted
        .iter()
        .enumerate()
        .map(|(i, start)| {
            sorted[i..]
                .iter()
                .take_while(|at| at.duration_since(*start) < window)
                .count()
        })
        .max()
        .unwrap_or(0)
}
