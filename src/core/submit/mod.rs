//! Remote submission
//!
//! A [`Submitter`] performs exactly one remote call for one item and reports
//! what happened as a [`RawOutcome`]. It never retries; retries belong to the
//! worker pool and its policy.

mod http_client;

pub use http_client::HttpSubmitter;

use crate::core::retry::RawOutcome;
use crate::core::voucher::WorkItem;
use async_trait::async_trait;

/// One remote call per item
#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, item: &WorkItem) -> RawOutcome;
}
