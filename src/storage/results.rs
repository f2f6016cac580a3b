//! CSV result sink

use crate::core::batch::ItemResult;
use crate::core::sink::ResultSink;
use crate::storage::run_folder::RunFolder;
use crate::utils::error::{Result, UploadError};
use std::path::{Path, PathBuf};
use tracing::info;

/// Columns appended after the original input columns
pub const OUTPUT_COLUMNS: [&str; 5] = [
    "success",
    "error_message",
    "retry_count",
    "status_code",
    "full_response",
];

/// Writes all results and the failed subset to two CSV files
///
/// Each row repeats the original record, columns in input order, followed by
/// [`OUTPUT_COLUMNS`]. A file is only written when it would have rows.
#[derive(Debug, Clone)]
pub struct CsvResultSink {
    results_path: PathBuf,
    failed_path: PathBuf,
}

impl CsvResultSink {
    pub fn new(results_path: impl Into<PathBuf>, failed_path: impl Into<PathBuf>) -> Self {
        Self {
            results_path: results_path.into(),
            failed_path: failed_path.into(),
        }
    }

    /// Sink writing next to the other files of a run folder
    pub fn for_run(folder: &RunFolder, input: &Path) -> Self {
        Self::new(folder.results_path(input), folder.failed_path(input))
    }

    pub fn results_path(&self) -> &Path {
        &self.results_path
    }

    pub fn failed_path(&self) -> &Path {
        &self.failed_path
    }
}

impl ResultSink for CsvResultSink {
    fn persist(&self, all: &[ItemResult], failed: &[&ItemResult]) -> Result<()> {
        if !all.is_empty() {
            write_rows(&self.results_path, all.iter())?;
            info!("Results written to {:?}", self.results_path);
        }
        if !failed.is_empty() {
            write_rows(&self.failed_path, failed.iter().copied())?;
            info!("Failed uploads saved to {:?}", self.failed_path);
        }
        Ok(())
    }
}

fn write_rows<'a>(path: &Path, rows: impl Iterator<Item = &'a ItemResult>) -> Result<()> {
    let mut rows = rows.peekable();
    let Some(first) = rows.peek() else {
        return Ok(());
    };
    let columns: Vec<String> = first.item.record.columns().map(str::to_string).collect();

    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| UploadError::sink(format!("Failed to create {:?}: {}", path, e)))?;

    let header = columns
        .iter()
        .map(String::as_str)
        .chain(OUTPUT_COLUMNS.iter().copied());
    writer.write_record(header)?;

    for entry in rows {
        let outcome = &entry.outcome;
        let mut record: Vec<String> = columns
            .iter()
            .map(|column| entry.item.record.get(column).unwrap_or_default().to_string())
            .collect();
        record.push(outcome.success.to_string());
        record.push(outcome.error_message.clone().unwrap_or_default());
        record.push(outcome.attempt_count.to_string());
        record.push(
            outcome
                .status_code
                .map(|status| status.to_string())
                .unwrap_or_default(),
        );
        record.push(outcome.response_body.clone().unwrap_or_default());
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}
