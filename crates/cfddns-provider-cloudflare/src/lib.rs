// # Cloudflare DNS Provider
//
// This crate provides the Cloudflare implementation of `DnsProvider`.
//
// ## Behaviour
//
// - ✅ Lists every record of a zone, following pagination
// - ✅ Overwrites one record per update call (PUT), all fields sent
// - ✅ HTTP timeout configured (30 seconds)
// - ✅ Specific error handling for HTTP status codes (401/403, 404, 429, 5xx)
// - ✅ Dry-run mode: listing happens, updates are only logged
// - ❌ NO retry logic (a failure ends the run)
// - ❌ NO rate limiting
// - ❌ NO caching between calls
//
// ## Security Requirements
//
// - API token NEVER appears in logs or Debug output
// - Construction fails if the token is empty
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List DNS Records: GET `/zones/:zone_id/dns_records?page=N&per_page=100`
// - Update DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`

mod wire;

use async_trait::async_trait;
use cfddns_core::traits::{DnsProvider, DnsProviderFactory, DnsRecord};
use cfddns_core::{Config, Error, Result};
use std::time::Duration;
use wire::{ApiDnsRecord, PROVIDER, UpdateRecordRequest};

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Records requested per list page
const PER_PAGE: u32 = 100;

/// Cloudflare DNS provider
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform the listing requests
/// - Log the intended PUT payload
/// - **NOT** modify any DNS record
pub struct CloudflareProvider {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API base URL
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, list records but skip PUT updates
    dry_run: bool,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:DNS:Edit permissions
    /// - `dry_run`: If true, list records but skip PUT updates
    pub fn new(api_token: impl Into<String>, dry_run: bool) -> Result<Self> {
        Self::with_base_url(api_token, CLOUDFLARE_API_BASE, dry_run)
    }

    /// Create a provider talking to a different API base URL
    pub fn with_base_url(
        api_token: impl Into<String>,
        base_url: impl Into<String>,
        dry_run: bool,
    ) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.trim().is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::provider(PROVIDER, format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            dry_run,
        })
    }

    /// Whether updates are only logged
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn records_url(&self, zone_id: &str) -> String {
        format!("{}/zones/{}/dns_records", self.base_url, zone_id)
    }

    /// Read a response body, mapping failures to errors
    async fn read_body(response: reqwest::Response, action: &str) -> Result<String> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("{}: failed to read response: {}", action, e)))?;

        if !status.is_success() {
            return Err(wire::status_error(status, &body, action));
        }
        Ok(body)
    }

    /// Fetch one page of a zone's records
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records?page=1&per_page=100
    /// Authorization: Bearer <token>
    /// ```
    async fn list_page(&self, zone_id: &str, page: u32) -> Result<(Vec<DnsRecord>, bool)> {
        const ACTION: &str = "List DNS records";

        let response = self
            .client
            .get(self.records_url(zone_id))
            .query(&[("page", page), ("per_page", PER_PAGE)])
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("HTTP request failed: {}", e)))?;

        let body = Self::read_body(response, ACTION).await?;
        let (records, info) = wire::decode::<Vec<ApiDnsRecord>>(&body, ACTION)?;

        let more = !records.is_empty() && wire::has_next_page(info.as_ref(), page);
        Ok((records.into_iter().map(DnsRecord::from).collect(), more))
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    async fn list_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>> {
        let mut records = Vec::new();
        let mut page = 1;

        loop {
            let (batch, more) = self.list_page(zone_id, page).await?;
            tracing::debug!("Page {} of zone records: {} record(s)", page, batch.len());
            records.extend(batch);

            if !more {
                break;
            }
            page += 1;
        }

        Ok(records)
    }

    /// Overwrite a DNS record
    ///
    /// # API Call
    ///
    /// ```http
    /// PUT /zones/:zone_id/dns_records/:record_id
    /// {
    ///   "name": "home.example.com",
    ///   "type": "A",
    ///   "content": "203.0.113.5",
    ///   "ttl": 1,
    ///   "proxied": false
    /// }
    /// ```
    async fn update_record(&self, zone_id: &str, record: &DnsRecord) -> Result<DnsRecord> {
        const ACTION: &str = "Update DNS record";

        let url = format!("{}/{}", self.records_url(zone_id), record.id);
        let payload = UpdateRecordRequest::from(record);

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send PUT request to {} with payload: {}",
                url,
                serde_json::to_string(&payload).unwrap_or_default()
            );
            return Ok(record.clone());
        }

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.api_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("HTTP request failed: {}", e)))?;

        let body = Self::read_body(response, ACTION).await?;
        let (updated, _) = wire::decode::<ApiDnsRecord>(&body, ACTION)?;

        tracing::debug!("Cloudflare accepted update of record {}", record.id);
        Ok(updated.into())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

/// Factory for creating Cloudflare providers
pub struct CloudflareFactory;

impl DnsProviderFactory for CloudflareFactory {
    fn create(&self, config: &Config) -> Result<Box<dyn DnsProvider>> {
        if config.is_dry_run() {
            tracing::warn!("Cloudflare provider running in DRY-RUN mode - no changes will be made");
        }

        Ok(Box::new(CloudflareProvider::new(
            config.api_token.clone(),
            config.is_dry_run(),
        )?))
    }
}
