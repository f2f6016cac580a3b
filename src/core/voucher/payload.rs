//! Voucher request payload

use super::record::SourceRecord;
use crate::utils::error::{Result, UploadError};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Voucher type tag sent with every voucher
pub const VOUCHER_TYPE_PERSONALISED: &str = "VOUCHER_TYPE_PERSONALISED";
/// Voucher status tag sent with every voucher
pub const VOUCHER_STATUS_UNCLAIMED: &str = "VOUCHER_BENEFIT_STATUS_UNCLAIMED";

/// Columns every input file must carry
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "offer_id",
    "voucher_value",
    "expiry_date",
    "voucher_code",
    "rzp_commission",
];
/// Recognized columns that may be absent
pub const OPTIONAL_COLUMNS: [&str; 1] = ["pin"];

/// One voucher as the endpoint expects it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherPayload {
    pub offer_id: String,
    pub voucher_type: String,
    pub voucher_status: String,
    pub voucher_value: i64,
    pub expiry_date: i64,
    pub voucher_code: String,
    pub rzp_commission: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub procurement_batch_id: Option<String>,
}

impl VoucherPayload {
    /// Derive the payload from a source record
    ///
    /// Values are trimmed. `pin` is included only when present and non-blank.
    pub fn from_record(
        row: usize,
        record: &SourceRecord,
        procurement_batch_id: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            offer_id: required_text(row, record, "offer_id")?,
            voucher_type: VOUCHER_TYPE_PERSONALISED.to_string(),
            voucher_status: VOUCHER_STATUS_UNCLAIMED.to_string(),
            voucher_value: required_int(row, record, "voucher_value")?,
            expiry_date: required_expiry(row, record)?,
            voucher_code: required_text(row, record, "voucher_code")?,
            rzp_commission: required_int(row, record, "rzp_commission")?,
            pin: record.get_trimmed("pin").map(str::to_string),
            procurement_batch_id: procurement_batch_id.map(str::to_string),
        })
    }
}

fn required_text(row: usize, record: &SourceRecord, column: &str) -> Result<String> {
    record
        .get_trimmed(column)
        .map(str::to_string)
        .ok_or_else(|| UploadError::validation(format!("row {}: {} is empty", row, column)))
}

fn required_int(row: usize, record: &SourceRecord, column: &str) -> Result<i64> {
    let raw = record
        .get_trimmed(column)
        .ok_or_else(|| UploadError::validation(format!("row {}: {} is empty", row, column)))?;
    raw.parse().map_err(|_| {
        UploadError::validation(format!(
            "row {}: {} must be an integer, got {:?}",
            row, column, raw
        ))
    })
}

fn required_expiry(row: usize, record: &SourceRecord) -> Result<i64> {
    let raw = record
        .get_trimmed("expiry_date")
        .ok_or_else(|| UploadError::validation(format!("row {}: expiry_date is empty", row)))?;
    parse_expiry(raw).ok_or_else(|| {
        UploadError::validation(format!(
            "row {}: expiry_date must be an epoch timestamp or a date, got {:?}",
            row, raw
        ))
    })
}

const EXPIRY_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S UTC",
    "%Y-%m-%d %H:%M:%S",
    "%d-%b-%Y, %H:%M",
    "%d-%B-%Y, %H:%M",
];
const EXPIRY_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d-%m-%Y", "%m/%d/%y"];

/// Parse an expiry cell into epoch seconds
///
/// Integers pass through unchanged. Dates and datetimes are read as UTC; a
/// bare date means midnight.
pub fn parse_expiry(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(timestamp) = raw.parse::<i64>() {
        return Some(timestamp);
    }
    EXPIRY_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            EXPIRY_DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|datetime| datetime.and_utc().timestamp())
}

/// Request body: `{"voucher_benefits": [<payload>]}`
#[derive(Debug, Serialize)]
pub struct VoucherBenefitsRequest<'a> {
    pub voucher_benefits: [&'a VoucherPayload; 1],
}

impl<'a> VoucherBenefitsRequest<'a> {
    pub fn single(payload: &'a VoucherPayload) -> Self {
        Self {
            voucher_benefits: [payload],
        }
    }
}
