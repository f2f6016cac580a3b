//! Test fixtures and data factories
//!
//! Provides factory methods for creating test data with sensible defaults.

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use voucher_upload::config::UploadSettings;
use voucher_upload::core::voucher::{SourceRecord, WorkItem};

/// Header used by generated input files
pub const CSV_HEADER: &str = "client,offer_id,voucher_value,expiry_date,voucher_code,rzp_commission,pin";

/// Factory for voucher records and CSV input
pub struct VoucherFactory;

impl VoucherFactory {
    /// Voucher code of the generated row
    pub fn code(row: usize) -> String {
        format!("VCH-{:05}", row)
    }

    /// One CSV data line
    pub fn csv_line(row: usize) -> String {
        let pin = if row % 2 == 0 { format!("{:04}", row) } else { String::new() };
        format!(
            "Client {},offer_42,{},1767225600,{},150,{}",
            row,
            1000 * row,
            Self::code(row),
            pin
        )
    }

    /// CSV content with `count` rows
    pub fn csv(count: usize) -> String {
        let mut content = String::from(CSV_HEADER);
        content.push('\n');
        for row in 1..=count {
            content.push_str(&Self::csv_line(row));
            content.push('\n');
        }
        content
    }

    /// A single work item
    pub fn item(row: usize) -> WorkItem {
        let code = Self::code(row);
        let value = (1000 * row).to_string();
        let record: SourceRecord = vec![
            ("client", "Acme"),
            ("offer_id", "offer_42"),
            ("voucher_value", value.as_str()),
            ("expiry_date", "1767225600"),
            ("voucher_code", code.as_str()),
            ("rzp_commission", "150"),
        ]
        .into_iter()
        .collect();
        WorkItem::from_record(row, record, None).expect("fixture record is valid")
    }

    /// `count` work items, rows 1 to `count`
    pub fn items(count: usize) -> Vec<WorkItem> {
        (1..=count).map(Self::item).collect()
    }
}

/// Engine settings with the given knobs and defaults elsewhere
pub fn settings(max_workers: usize, requests_per_second: u32, chunk_size: usize) -> UploadSettings {
    UploadSettings {
        max_workers,
        requests_per_second,
        chunk_size,
        control_poll_interval_ms: 100,
        ..UploadSettings::default()
    }
}

/// A temporary run folder with `meta.json` and an input file
pub struct RunFolderFixture {
    pub dir: TempDir,
    pub input: PathBuf,
}

impl RunFolderFixture {
    /// Run folder whose input holds `count` generated rows
    pub fn new(count: usize) -> Self {
        Self::with_csv(&VoucherFactory::csv(count))
    }

    /// Run folder with the given input content
    pub fn with_csv(csv: &str) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        std::fs::write(
            dir.path().join("meta.json"),
            r#"{"run_id":"run-test","env":"staging","file_name":"vouchers.csv","user":"ops"}"#,
        )
        .expect("write meta.json");
        let input = dir.path().join("vouchers.csv");
        std::fs::write(&input, csv).expect("write input");
        Self { dir, input }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn results_path(&self) -> PathBuf {
        self.path().join("vouchers_upload_results.csv")
    }

    pub fn failed_path(&self) -> PathBuf {
        self.path().join("vouchers_failed_uploads.csv")
    }

    /// Rows of a CSV file, header included
    pub fn read_csv(path: &Path) -> Vec<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)
            .expect("open csv");
        reader
            .records()
            .map(|r| r.expect("csv record").iter().map(str::to_string).collect())
            .collect()
    }
}
