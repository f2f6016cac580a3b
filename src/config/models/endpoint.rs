//! Remote endpoint configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Where and how vouchers are submitted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EndpointConfig {
    /// Base URL of the offers API, without the endpoint path
    #[serde(default)]
    pub base_url: String,
    /// Endpoint path appended to `base_url`
    #[serde(default = "default_endpoint_path")]
    pub path: String,
    /// Credentials sent with every request
    #[serde(default)]
    pub credentials: Credentials,
    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            path: default_endpoint_path(),
            credentials: Credentials::default(),
            headers: BTreeMap::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl EndpointConfig {
    /// Full submission URL
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.path)
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Credentials for the remote endpoint
#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Credentials {
    /// No authorization header
    #[default]
    None,
    /// HTTP basic authentication
    Basic { username: String, password: String },
    /// Bearer token
    Bearer { token: String },
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::None => write!(f, "None"),
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
            Credentials::Bearer { .. } => f
                .debug_struct("Bearer")
                .field("token", &"[REDACTED]")
                .finish(),
        }
    }
}
