//! Batch processing types and data structures

use crate::core::retry::RawOutcome;
use crate::core::voucher::WorkItem;
use crate::utils::truncate_chars;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Terminal result of processing one work item
///
/// Exactly one of `success` and a populated `error_message` holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Whether the endpoint accepted the item
    pub success: bool,
    /// Status of the last response, if any response was received
    pub status_code: Option<u16>,
    /// Body of the last response, truncated
    pub response_body: Option<String>,
    /// Last observed error, verbatim; `None` on success
    pub error_message: Option<String>,
    /// Attempts made, between 1 and the retry budget
    pub attempt_count: u32,
}

impl Outcome {
    /// Successful outcome from the accepting attempt
    pub fn succeeded(attempt_count: u32, raw: &RawOutcome, max_body_chars: usize) -> Self {
        Self {
            success: true,
            status_code: raw.status(),
            response_body: raw.body().map(|b| truncate_chars(b, max_body_chars)),
            error_message: None,
            attempt_count,
        }
    }

    /// Failed outcome carrying the last attempt's error
    pub fn failed(attempt_count: u32, raw: &RawOutcome, max_body_chars: usize) -> Self {
        let error = raw.error_text();
        let error_message = match (error.trim().is_empty(), raw.status()) {
            (false, _) => error,
            (true, Some(status)) => format!("HTTP {} with empty response body", status),
            (true, None) => "request failed without an error description".to_string(),
        };

        Self {
            success: false,
            status_code: raw.status(),
            response_body: raw.body().map(|b| truncate_chars(b, max_body_chars)),
            error_message: Some(error_message),
            attempt_count,
        }
    }
}

/// A work item joined with its terminal outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemResult {
    pub item: WorkItem,
    pub outcome: Outcome,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Every chunk was processed
    Completed,
    /// The control signal reported Stopped before the input was exhausted
    Stopped,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Completed => write!(f, "completed"),
            RunStatus::Stopped => write!(f, "stopped"),
        }
    }
}

/// Chunk-level progress report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkProgress {
    /// 1-based index of the chunk just finished
    pub chunk: usize,
    /// Number of chunks in the run
    pub chunk_count: usize,
    /// Items in the chunk just finished
    pub chunk_len: usize,
    /// Items in all finished chunks
    pub processed: usize,
    /// Items in the input
    pub total: usize,
    /// Successes so far
    pub succeeded: usize,
    /// Failures so far
    pub failed: usize,
}

impl ChunkProgress {
    /// Whole-number percentage of input covered by finished chunks
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            100
        } else {
            self.processed * 100 / self.total
        }
    }
}

/// Aggregate of all outcomes produced before the run ended
///
/// Entries are in input order. Dropped items never appear.
#[derive(Debug, Clone)]
pub struct BatchResult {
    entries: Vec<ItemResult>,
    status: RunStatus,
    total_items: usize,
    dropped: usize,
    chunks_processed: usize,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
}

impl BatchResult {
    pub(crate) fn new(
        entries: Vec<ItemResult>,
        status: RunStatus,
        total_items: usize,
        dropped: usize,
        chunks_processed: usize,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            entries,
            status,
            total_items,
            dropped,
            chunks_processed,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// All terminal outcomes in input order
    pub fn entries(&self) -> &[ItemResult] {
        &self.entries
    }

    pub fn successes(&self) -> impl Iterator<Item = &ItemResult> {
        self.entries.iter().filter(|e| e.outcome.success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ItemResult> {
        self.entries.iter().filter(|e| !e.outcome.success)
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Items abandoned because the run was stopped before they finished
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn chunks_processed(&self) -> usize {
        self.chunks_processed
    }

    pub fn summary(&self) -> BatchSummary {
        let succeeded = self.successes().count();
        let failed = self.entries.len() - succeeded;
        BatchSummary {
            status: self.status,
            total: self.total_items,
            succeeded,
            failed,
            dropped: self.dropped,
            not_started: self
                .total_items
                .saturating_sub(self.entries.len() + self.dropped),
            chunks_processed: self.chunks_processed,
            started_at: self.started_at,
            finished_at: self.finished_at,
        }
    }
}

/// Counts reported at the end of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub status: RunStatus,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub dropped: usize,
    pub not_started: usize,
    pub chunks_processed: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl std::fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Total: {}, Success: {}, Failed: {}",
            self.total, self.succeeded, self.failed
        )?;
        if self.status == RunStatus::Stopped {
            write!(
                f,
                " (stopped: {} dropped, {} not started)",
                self.dropped, self.not_started
            )?;
        }
        Ok(())
    }
}
