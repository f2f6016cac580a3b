//! Error types for the uploader

use thiserror::Error;

/// Result type alias for the uploader
pub type Result<T> = std::result::Result<T, UploadError>;

/// Main error type for the uploader
#[derive(Error, Debug)]
pub enum UploadError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input file errors (missing headers, missing columns, unreadable run folder)
    #[error("Input error: {0}")]
    Input(String),

    /// Record validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Result sink errors
    #[error("Result sink error: {0}")]
    Sink(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}
