//! Error handling for the uploader
//!
//! Process-level failures (configuration, input, sinks) are reported through
//! [`UploadError`]. Per-item submission failures never surface here; they are
//! recorded on the item's outcome instead.

mod helpers;
mod types;

pub use types::{Result, UploadError};
