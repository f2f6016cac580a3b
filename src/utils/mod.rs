//! Utility modules for the uploader
//!
//! - **error**: error types shared by every layer
//! - **logging**: tracing subscriber setup

pub mod error;
pub mod logging;

/// Truncate a string to at most `max_chars` characters, respecting char boundaries
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => s[..byte_idx].to_string(),
        None => s.to_string(),
    }
}
