//! Environment variable overrides
//!
//! Every knob can be set through a `VOUCHER_UPLOAD_*` variable. Lookups go
//! through a closure so the same code serves the real environment and tests.

use super::Config;
use super::models::Credentials;
use crate::utils::error::{Result, UploadError};
use std::str::FromStr;
use tracing::debug;

/// Prefix shared by all recognized environment variables
pub const ENV_PREFIX: &str = "VOUCHER_UPLOAD_";

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let key = format!("{}{}", ENV_PREFIX, name);
    match lookup(&key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| UploadError::config(format!("Invalid {}: {}", key, e))),
        None => Ok(None),
    }
}

impl Config {
    /// Apply `VOUCHER_UPLOAD_*` overrides read through `lookup`
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(base_url) = var("BASE_URL") {
            self.endpoint.base_url = base_url;
        }
        if let Some(timeout) = parse_var(&lookup, "TIMEOUT_SECS")? {
            self.endpoint.timeout_secs = timeout;
        }

        if let Some(token) = var("TOKEN") {
            self.endpoint.credentials = Credentials::Bearer { token };
        } else if let Some(username) = var("USERNAME") {
            let password = match (var("PASSWORD"), &self.endpoint.credentials) {
                (Some(password), _) => password,
                (None, Credentials::Basic { password, .. }) => password.clone(),
                (None, _) => String::new(),
            };
            self.endpoint.credentials = Credentials::Basic { username, password };
        } else if let Some(new_password) = var("PASSWORD") {
            if let Credentials::Basic { password, .. } = &mut self.endpoint.credentials {
                *password = new_password;
            }
        }

        if let Some(max_workers) = parse_var(&lookup, "MAX_WORKERS")? {
            self.upload.max_workers = max_workers;
        }
        if let Some(rps) = parse_var(&lookup, "REQUESTS_PER_SECOND")? {
            self.upload.requests_per_second = rps;
        }
        if let Some(chunk_size) = parse_var(&lookup, "CHUNK_SIZE")? {
            self.upload.chunk_size = chunk_size;
        }
        if let Some(max_retries) = parse_var(&lookup, "MAX_RETRIES")? {
            self.upload.max_retries = max_retries;
        }
        if let Some(interval) = parse_var(&lookup, "CONTROL_POLL_INTERVAL_MS")? {
            self.upload.control_poll_interval_ms = interval;
        }
        if let Some(batch_id) = var("PROCUREMENT_BATCH_ID") {
            self.upload.procurement_batch_id = Some(batch_id);
        }

        debug!("Environment overrides applied");
        Ok(self)
    }
}
