// # HTTP IP Source
//
// This crate resolves the caller's public IP by asking an external
// endpoint (https://checkip.amazonaws.com by default) which answers with
// the address as plain text.
//
// One GET per call, bounded by a 10 second timeout, never retried.

use cfddns_core::config::Config;
use cfddns_core::traits::{IpSource, IpSourceFactory};
use cfddns_core::{Error, Result};

use std::time::Duration;

/// Timeout for the public IP request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-based public IP resolver
#[derive(Debug)]
pub struct HttpIpSource {
    /// URL to fetch IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: URL answering with the public IP as plain text
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

/// Turn a response body into the public IP text
///
/// Only surrounding whitespace is removed; the value is not checked to be
/// an address and may be empty.
fn normalize_body(body: &str) -> String {
    body.trim().to_string()
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<String> {
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::network(format!(
                    "Request to {} timed out after {:?}",
                    self.url, REQUEST_TIMEOUT
                ))
            } else {
                Error::network(format!("Request to {} failed: {}", self.url, e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("{} answered with HTTP {}, using its body anyway", self.url, status);
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::network(format!("Failed to read response from {}: {}", self.url, e)))?;

        tracing::debug!("Public IP endpoint returned {} byte(s)", body.len());

        Ok(normalize_body(&body))
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}

/// Factory for creating HTTP IP sources
pub struct HttpIpSourceFactory;

impl IpSourceFactory for HttpIpSourceFactory {
    fn create(&self, config: &Config) -> Result<Box<dyn IpSource>> {
        Ok(Box::new(HttpIpSource::new(config.public_ip_url.clone())?))
    }
}
