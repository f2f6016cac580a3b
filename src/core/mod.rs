//! Core functionality for the uploader
//!
//! This module contains the submission engine and the types it works on.
//! Leaf components first: run-state control, rate limiting, retry decisions,
//! then the worker pool and the chunk coordinator that drive them.

pub mod batch;
pub mod control;
pub mod engine;
pub mod rate_limiter;
pub mod retry;
pub mod sink;
pub mod submit;
pub mod voucher;
pub mod worker_pool;


pub use batch::{BatchCoordinator, BatchResult, BatchSummary, ItemResult, Outcome, RunStatus};
pub use control::{ControlSignal, FileControlSignal, RunState, SharedControlSignal};
pub use engine::UploadEngine;
pub use rate_limiter::RateLimiter;
pub use retry::{RawOutcome, RetryDecision, RetryPolicy};
pub use sink::{MemoryResultSink, ResultSink};
pub use submit::{HttpSubmitter, Submitter};
pub use voucher::{SourceRecord, VoucherPayload, WorkItem};
pub use worker_pool::WorkerPool;
