//! Configuration management for the uploader
//!
//! Configuration is layered: a YAML file, then `VOUCHER_UPLOAD_*` environment
//! variables, then command line flags. Validation runs once all layers are
//! merged.

pub mod loader;
pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{Result, UploadError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for the uploader
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Remote endpoint configuration
    #[serde(default)]
    pub endpoint: EndpointConfig,
    /// Engine tuning
    #[serde(default)]
    pub upload: UploadSettings,
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// The result is not validated yet; callers apply overrides first and
    /// then call [`Config::validate`].
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| UploadError::config(format!("Failed to read config file: {}", e)))?;

        Self::from_yaml_str(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| UploadError::config(format!("Failed to parse config: {}", e)))?;
        debug!("Configuration parsed successfully");
        Ok(config)
    }

    /// Get endpoint configuration
    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    /// Get engine settings
    pub fn upload(&self) -> &UploadSettings {
        &self.upload
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.endpoint
            .validate()
            .map_err(|e| UploadError::config(format!("Endpoint config error: {}", e)))?;

        self.upload
            .validate()
            .map_err(|e| UploadError::config(format!("Upload config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| UploadError::config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
