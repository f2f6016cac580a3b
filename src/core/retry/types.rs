//! Types for retry decisions

use crate::config::UploadSettings;
use std::time::Duration;

/// Result of one remote call, before any retry decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawOutcome {
    /// The endpoint answered with a status code and body
    Response { status: u16, body: String },
    /// The request never produced a response (connect, timeout, protocol error)
    Transport { message: String },
}

impl RawOutcome {
    pub fn response(status: u16, body: impl Into<String>) -> Self {
        Self::Response {
            status,
            body: body.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// HTTP status, if a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            Self::Transport { .. } => None,
        }
    }

    /// Response body, if a response was received
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Response { body, .. } => Some(body),
            Self::Transport { .. } => None,
        }
    }

    /// Text recorded as the error message when this is the final attempt
    pub fn error_text(&self) -> String {
        match self {
            Self::Response { body, .. } => body.clone(),
            Self::Transport { message } => message.clone(),
        }
    }
}

/// How a raw outcome is treated by the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeClass {
    /// The configured success status
    Success,
    /// The configured throttle status
    Throttled,
    /// Any other status
    Rejected,
    /// No response at all
    Transport,
}

/// What the worker does next with an item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Terminal success
    Accept,
    /// Sleep this long, then attempt again
    RetryAfter(Duration),
    /// Terminal failure carrying the last observed error
    GiveUp,
}

/// Retry configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum attempts per item, throttled attempts included
    pub max_retries: u32,
    /// First backoff delay
    pub base_delay: Duration,
    /// Backoff growth per failed attempt
    pub backoff_multiplier: f64,
    /// Throttle delay as a multiple of `base_delay`
    pub throttle_multiplier: f64,
    /// Status code meaning success
    pub success_status: u16,
    /// Status code meaning the server throttled us
    pub throttle_status: u16,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::from_settings(&UploadSettings::default())
    }
}

impl RetryConfig {
    /// Derive the retry configuration from engine settings; base delay is `1/R`
    pub fn from_settings(settings: &UploadSettings) -> Self {
        Self {
            max_retries: settings.max_retries.max(1),
            base_delay: settings.base_delay(),
            backoff_multiplier: 2.0,
            throttle_multiplier: 5.0,
            success_status: settings.success_status,
            throttle_status: settings.throttle_status,
        }
    }
}
