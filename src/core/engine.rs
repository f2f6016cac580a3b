//! Upload engine assembly
//!
//! Wires the shared rate limiter, retry policy, worker pool and coordinator
//! from [`UploadSettings`].

use crate::config::UploadSettings;
use crate::core::batch::{BatchCoordinator, BatchResult, ChunkProgress};
use crate::core::control::ControlSignal;
use crate::core::rate_limiter::RateLimiter;
use crate::core::retry::{RetryConfig, RetryPolicy};
use crate::core::sink::ResultSink;
use crate::core::submit::Submitter;
use crate::core::voucher::WorkItem;
use crate::core::worker_pool::WorkerPool;
use crate::utils::error::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// A fully wired engine for one run
#[derive(Debug)]
pub struct UploadEngine {
    coordinator: BatchCoordinator,
}

impl UploadEngine {
    /// Build an engine from settings and the two injected collaborators
    pub fn new(
        settings: &UploadSettings,
        submitter: Arc<dyn Submitter>,
        control: Arc<dyn ControlSignal>,
    ) -> Self {
        debug!("Building upload engine: {:?}", settings);

        let limiter = Arc::new(RateLimiter::new(settings.requests_per_second));
        let policy = RetryPolicy::new(RetryConfig::from_settings(settings));
        let pool = WorkerPool::new(
            settings.max_workers,
            limiter,
            policy,
            control.clone(),
            submitter,
        )
        .with_max_response_chars(settings.max_response_chars);

        Self {
            coordinator: BatchCoordinator::new(pool, control, settings.chunk_size),
        }
    }

    /// Report progress to `callback` after every chunk
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ChunkProgress) + Send + Sync + 'static,
    {
        self.coordinator = self.coordinator.with_progress(callback);
        self
    }

    pub fn coordinator(&self) -> &BatchCoordinator {
        &self.coordinator
    }

    /// Process all items; never fails
    pub async fn run(&self, items: Vec<WorkItem>) -> BatchResult {
        self.coordinator.run(items).await
    }

    /// Process all items and persist the results
    ///
    /// Only the sink can fail; the run itself always produces a result.
    pub async fn run_and_persist(
        &self,
        items: Vec<WorkItem>,
        sink: &dyn ResultSink,
    ) -> Result<BatchResult> {
        let result = self.run(items).await;
        sink.persist_result(&result)?;
        info!("Persisted {} results", result.len());
        Ok(result)
    }
}
