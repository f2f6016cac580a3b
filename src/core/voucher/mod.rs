//! Work items: source records and the voucher payloads derived from them

mod payload;
mod record;


pub use payload::{
    OPTIONAL_COLUMNS, REQUIRED_COLUMNS, VOUCHER_STATUS_UNCLAIMED, VOUCHER_TYPE_PERSONALISED,
    VoucherBenefitsRequest, VoucherPayload, parse_expiry,
};
pub use record::SourceRecord;

use serde::{Deserialize, Serialize};

/// One unit of submission derived from one input record
///
/// The original record is kept so output rows can echo every input column,
/// including ones the endpoint never sees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    /// 1-based data row number in the input
    pub row: usize,
    /// Original record, columns in input order
    pub record: SourceRecord,
    /// Request payload sent to the endpoint
    pub payload: VoucherPayload,
}

impl WorkItem {
    pub fn new(row: usize, record: SourceRecord, payload: VoucherPayload) -> Self {
        Self {
            row,
            record,
            payload,
        }
    }

    /// Map a record to a work item
    pub fn from_record(
        row: usize,
        record: SourceRecord,
        procurement_batch_id: Option<&str>,
    ) -> crate::utils::error::Result<Self> {
        let payload = VoucherPayload::from_record(row, &record, procurement_batch_id)?;
        Ok(Self::new(row, record, payload))
    }

    /// Voucher code, used to identify the item in logs
    pub fn voucher_code(&self) -> &str {
        &self.payload.voucher_code
    }

    /// JSON body for the remote call
    pub fn request_body(&self) -> VoucherBenefitsRequest<'_> {
        VoucherBenefitsRequest::single(&self.payload)
    }
}
