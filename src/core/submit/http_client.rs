//! HTTP submitter for the voucher-benefits endpoint

use super::Submitter;
use crate::config::{Credentials, EndpointConfig};
use crate::core::retry::RawOutcome;
use crate::core::voucher::WorkItem;
use crate::utils::error::{Result, UploadError};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

/// Posts `{"voucher_benefits": [payload]}` to the configured endpoint
#[derive(Debug, Clone)]
pub struct HttpSubmitter {
    client: reqwest::Client,
    url: String,
    credentials: Credentials,
}

impl HttpSubmitter {
    /// Build a submitter with its own connection pool
    pub fn new(config: &EndpointConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| UploadError::config(format!("Invalid header name {:?}: {}", name, e)))?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                UploadError::config(format!("Invalid value for header {:?}: {}", name, e))
            })?;
            headers.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            url: config.url(),
            credentials: config.credentials.clone(),
        })
    }

    /// Full URL requests are posted to
    pub fn url(&self) -> &str {
        &self.url
    }

    fn request(&self, item: &WorkItem) -> reqwest::RequestBuilder {
        let request = self.client.post(&self.url).json(&item.request_body());
        match &self.credentials {
            Credentials::None => request,
            Credentials::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
            Credentials::Bearer { token } => request.bearer_auth(token),
        }
    }
}

#[async_trait]
impl Submitter for HttpSubmitter {
    async fn submit(&self, item: &WorkItem) -> RawOutcome {
        let response = match self.request(item).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("Transport error for {}: {}", item.voucher_code(), e);
                return RawOutcome::transport(e.to_string());
            }
        };

        let status = response.status().as_u16();
        match response.text().await {
            Ok(body) => RawOutcome::response(status, body),
            Err(e) => {
                debug!("Unreadable body for {} (HTTP {}): {}", item.voucher_code(), status, e);
                RawOutcome::response(status, format!("response body could not be read: {}", e))
            }
        }
    }
}
