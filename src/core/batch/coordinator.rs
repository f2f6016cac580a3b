//! Chunked run driver

use super::types::{BatchResult, ChunkProgress, ItemResult, RunStatus};
use crate::core::control::{ControlSignal, RunState};
use crate::core::voucher::WorkItem;
use crate::core::worker_pool::WorkerPool;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// Callback invoked after each finished chunk
pub type ProgressCallback = Arc<dyn Fn(&ChunkProgress) + Send + Sync>;

/// Splits the input into chunks and feeds them to the worker pool in order
///
/// Chunk boundaries are the checkpoints for pause and stop: the control
/// signal is polled before every chunk, and a chunk in which a worker
/// abandoned an item ends the run as stopped.
pub struct BatchCoordinator {
    pool: WorkerPool,
    control: Arc<dyn ControlSignal>,
    chunk_size: usize,
    progress: Option<ProgressCallback>,
}

impl BatchCoordinator {
    /// Create a coordinator; a chunk size of zero is treated as one
    pub fn new(pool: WorkerPool, control: Arc<dyn ControlSignal>, chunk_size: usize) -> Self {
        Self {
            pool,
            control,
            chunk_size: chunk_size.max(1),
            progress: None,
        }
    }

    /// Report progress to `callback` after every chunk
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ChunkProgress) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(callback));
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Process all items, chunk by chunk, until done or stopped
    ///
    /// Never fails: per-item errors end up in the outcomes, and a stop
    /// returns whatever finished before it.
    pub async fn run(&self, items: Vec<WorkItem>) -> BatchResult {
        let started_at = Utc::now();
        let total = items.len();
        let chunk_count = total.div_ceil(self.chunk_size);

        let mut entries: Vec<ItemResult> = Vec::with_capacity(total);
        let mut status = RunStatus::Completed;
        let mut dropped = 0usize;
        let mut chunks_processed = 0usize;
        let mut processed = 0usize;
        let mut succeeded = 0usize;
        let mut failed = 0usize;

        info!(
            "Starting run: {} items in {} chunks of up to {}",
            total, chunk_count, self.chunk_size
        );

        let mut remaining = items.into_iter();
        loop {
            let chunk: Vec<WorkItem> = remaining.by_ref().take(self.chunk_size).collect();
            if chunk.is_empty() {
                break;
            }

            let chunk_number = chunks_processed + 1;
            if !self.checkpoint(chunk_number).await {
                status = RunStatus::Stopped;
                break;
            }

            let chunk_len = chunk.len();
            let outcomes = self.pool.process_chunk(&chunk).await;

            let mut chunk_dropped = 0usize;
            for (item, outcome) in chunk.into_iter().zip(outcomes) {
                match outcome {
                    Some(outcome) => {
                        if outcome.success {
                            succeeded += 1;
                        } else {
                            failed += 1;
                        }
                        entries.push(ItemResult { item, outcome });
                    }
                    None => chunk_dropped += 1,
                }
            }

            chunks_processed += 1;
            processed += chunk_len;
            dropped += chunk_dropped;

            let progress = ChunkProgress {
                chunk: chunk_number,
                chunk_count,
                chunk_len,
                processed,
                total,
                succeeded,
                failed,
            };
            info!(
                "Chunk {}/{} done: {}/{} items ({}%), {} succeeded, {} failed",
                progress.chunk,
                progress.chunk_count,
                progress.processed,
                progress.total,
                progress.percent(),
                progress.succeeded,
                progress.failed
            );
            if let Some(callback) = &self.progress {
                callback(&progress);
            }

            if chunk_dropped > 0 {
                info!(
                    "Run stopped during chunk {}, {} items dropped",
                    chunk_number, chunk_dropped
                );
                status = RunStatus::Stopped;
                break;
            }
        }

        let result = BatchResult::new(
            entries,
            status,
            total,
            dropped,
            chunks_processed,
            started_at,
        );
        info!("Run {}: {}", status, result.summary());
        result
    }

    /// Safe point before a chunk; `false` means end the run
    async fn checkpoint(&self, chunk_number: usize) -> bool {
        match self.control.poll().await {
            RunState::Running => true,
            RunState::Stopped => {
                info!("Stop requested, chunk {} not started", chunk_number);
                false
            }
            RunState::Paused => {
                info!("Run paused before chunk {}", chunk_number);
                let resumed = self.control.await_resume_or_stop().await;
                if resumed {
                    info!("Run resumed");
                } else {
                    info!("Stop requested while paused, chunk {} not started", chunk_number);
                }
                resumed
            }
        }
    }
}

impl std::fmt::Debug for BatchCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchCoordinator")
            .field("pool", &self.pool)
            .field("chunk_size", &self.chunk_size)
            .field("progress", &self.progress.is_some())
            .finish_non_exhaustive()
    }
}
