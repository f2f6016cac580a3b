//! Helper functions for creating specific error types

use super::types::UploadError;

impl UploadError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn input<S: Into<String>>(message: S) -> Self {
        Self::Input(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn sink<S: Into<String>>(message: S) -> Self {
        Self::Sink(message.into())
    }
}
