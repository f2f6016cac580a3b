//! Endpoint and upload settings validators

use super::trait_def::Validate;
use super::base_url::validate_base_url;
use crate::config::models::*;

impl Validate for EndpointConfig {
    fn validate(&self) -> Result<(), String> {
        validate_base_url(&self.base_url, "base_url")?;

        if !self.path.starts_with('/') {
            return Err(format!("Endpoint path must start with '/', got: {}", self.path));
        }

        if self.timeout_secs == 0 {
            return Err("Request timeout must be greater than 0".to_string());
        }

        match &self.credentials {
            Credentials::Basic { username, .. } if username.trim().is_empty() => {
                return Err("Basic credentials require a username".to_string());
            }
            Credentials::Bearer { token } if token.trim().is_empty() => {
                return Err("Bearer credentials require a token".to_string());
            }
            _ => {}
        }

        for name in self.headers.keys() {
            if name.trim().is_empty() {
                return Err("Header names must not be empty".to_string());
            }
        }

        Ok(())
    }
}

impl Validate for UploadSettings {
    fn validate(&self) -> Result<(), String> {
        if self.max_workers == 0 {
            return Err("max_workers must be at least 1".to_string());
        }

        if self.requests_per_second == 0 {
            return Err("requests_per_second must be at least 1".to_string());
        }

        if self.chunk_size == 0 {
            return Err("chunk_size must be at least 1".to_string());
        }

        if self.max_retries == 0 {
            return Err("max_retries must be at least 1".to_string());
        }

        if self.control_poll_interval_ms == 0 {
            return Err("control_poll_interval_ms must be greater than 0".to_string());
        }

        if self.success_status == self.throttle_status {
            return Err("success_status and throttle_status must differ".to_string());
        }

        Ok(())
    }
}
