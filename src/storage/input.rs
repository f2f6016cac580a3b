//! CSV input loading
//!
//! The whole file is read and validated before anything is submitted, so a
//! bad cell in row 9000 fails the run up front instead of half-way through.

use crate::core::voucher::{REQUIRED_COLUMNS, SourceRecord, WorkItem};
use crate::utils::error::{Result, UploadError};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// A validated input file
#[derive(Debug, Clone)]
pub struct InputFile {
    /// Header row, in file order
    pub headers: Vec<String>,
    /// One work item per data row
    pub items: Vec<WorkItem>,
}

impl InputFile {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Load and validate a CSV file of voucher records
pub fn load_work_items(path: &Path, procurement_batch_id: Option<&str>) -> Result<InputFile> {
    info!("Loading vouchers from {:?}", path);
    let file = std::fs::File::open(path)
        .map_err(|e| UploadError::input(format!("Failed to open {:?}: {}", path, e)))?;
    let input = read_work_items(file, procurement_batch_id)?;
    info!("Prepared {} vouchers for upload", input.len());
    Ok(input)
}

/// Read and validate CSV records from any reader
pub fn read_work_items<R: Read>(
    reader: R,
    procurement_batch_id: Option<&str>,
) -> Result<InputFile> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(UploadError::input("CSV file is empty or has no headers"));
    }

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == column))
        .collect();
    if !missing.is_empty() {
        return Err(UploadError::input(format!(
            "Required columns missing from CSV: {}",
            missing.join(", ")
        )));
    }
    debug!("CSV headers: {:?}", headers);

    let mut items = Vec::new();
    for (index, row) in csv_reader.records().enumerate() {
        let row = row?;
        let values: Vec<&str> = row.iter().collect();
        let record = SourceRecord::from_row(&headers, &values);
        items.push(WorkItem::from_record(index + 1, record, procurement_batch_id)?);
    }

    Ok(InputFile { headers, items })
}
