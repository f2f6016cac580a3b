//! # voucher-upload
//!
//! Controlled, concurrent submission of voucher records to a remote endpoint.
//!
//! ## Features
//!
//! - **Bounded concurrency**: a fixed number of in-flight requests per chunk
//! - **Global rate limit**: one token bucket shared by every worker
//! - **Retry with backoff**: doubling delays, extended waits on throttling
//! - **Pause and stop**: an externally written run state, polled at safe points
//! - **Ordered results**: outcomes kept in input order, written back as CSV
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use voucher_upload::{Config, HttpSubmitter, SharedControlSignal, UploadEngine};
//! use voucher_upload::storage::load_work_items;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/upload.yaml").await?;
//!     config.validate()?;
//!
//!     let input = load_work_items(std::path::Path::new("vouchers.csv"), None)?;
//!     let control = SharedControlSignal::default();
//!     let engine = UploadEngine::new(
//!         config.upload(),
//!         Arc::new(HttpSubmitter::new(config.endpoint())?),
//!         Arc::new(control.clone()),
//!     );
//!
//!     let result = engine.run(input.items).await;
//!     println!("{}", result.summary());
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod config;
pub mod core;
pub mod storage;
pub mod utils;

pub use config::Config;
pub use core::{
    BatchCoordinator, BatchResult, BatchSummary, ControlSignal, FileControlSignal, HttpSubmitter,
    ItemResult, MemoryResultSink, Outcome, RateLimiter, RawOutcome, ResultSink, RetryDecision,
    RetryPolicy, RunState, RunStatus, SharedControlSignal, SourceRecord, Submitter, UploadEngine,
    VoucherPayload, WorkItem, WorkerPool,
};
pub use utils::error::{Result, UploadError};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build timestamp, seconds since the epoch
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
            rust_version: env!("RUST_VERSION"),
        }
    }
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} ({}, {})",
            NAME, self.version, self.git_hash, self.rust_version
        )
    }
}

/// Build information of this binary
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
