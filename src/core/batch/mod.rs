//! Run-level batch processing
//!
//! The coordinator splits the input into chunks, hands each chunk to the
//! worker pool, and collects the outcomes in input order.

mod coordinator;
mod types;


pub use coordinator::{BatchCoordinator, ProgressCallback};
pub use types::{BatchResult, BatchSummary, ChunkProgress, ItemResult, Outcome, RunStatus};
