//! Destination for the final results of a run

use crate::core::batch::{BatchResult, ItemResult};
use crate::utils::error::Result;
use parking_lot::Mutex;

/// Receives every terminal outcome of a run and the failed subset
///
/// Both slices are in input order. Dropped items are absent from both.
pub trait ResultSink: Send + Sync {
    fn persist(&self, all: &[ItemResult], failed: &[&ItemResult]) -> Result<()>;

    /// Hand a finished run to the sink
    fn persist_result(&self, result: &BatchResult) -> Result<()> {
        let failed: Vec<&ItemResult> = result.failures().collect();
        self.persist(result.entries(), &failed)
    }
}

/// Sink that keeps results in memory
#[derive(Debug, Default)]
pub struct MemoryResultSink {
    all: Mutex<Vec<ItemResult>>,
    failed: Mutex<Vec<ItemResult>>,
}

impl MemoryResultSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<ItemResult> {
        self.all.lock().clone()
    }

    pub fn failed(&self) -> Vec<ItemResult> {
        self.failed.lock().clone()
    }
}

impl ResultSink for MemoryResultSink {
    fn persist(&self, all: &[ItemResult], failed: &[&ItemResult]) -> Result<()> {
        self.all.lock().extend_from_slice(all);
        self.failed
            .lock()
            .extend(failed.iter().map(|entry| (*entry).clone()));
        Ok(())
    }
}
