// # DNS Provider Trait
//
// Defines the interface for reading and rewriting DNS records via provider
// APIs.
//
// ## Implementations
//
// - Cloudflare: `cfddns-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use cfddns_core::DnsProvider;
//
// let provider = /* DnsProvider implementation */;
//
// for record in provider.list_records("zone-id").await? {
//     if record.record_type == "A" && record.content != public_ip {
//         provider.update_record("zone-id", &record.with_content(&public_ip)).await?;
//     }
// }
// ```

use async_trait::async_trait;

/// A DNS record as reported by the provider
///
/// Only `content` is ever rewritten; every other field is carried forward
/// unchanged on update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    /// The record ID (provider-specific)
    pub id: String,
    /// Fully qualified record name
    pub name: String,
    /// Record type ("A", "AAAA", "CNAME", ...)
    pub record_type: String,
    /// Record value; the IP address for A records
    pub content: String,
    /// Time-to-live in seconds (1 means "automatic" on Cloudflare)
    pub ttl: u32,
    /// Whether traffic is proxied through the provider, if reported
    pub proxied: Option<bool>,
}

impl DnsRecord {
    /// Copy of this record with only the content replaced
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..self.clone()
        }
    }

    /// Whether this is an IPv4 address record
    pub fn is_a_record(&self) -> bool {
        self.record_type == "A"
    }
}

/// Trait for DNS provider implementations
///
/// # Trust Level: Untrusted
///
/// ## Allowed Capabilities
/// - ✅ Perform HTTP/HTTPS API calls to their endpoints only
/// - ✅ Parse provider-specific responses
/// - ✅ Return success or failure
///
/// ## Forbidden Capabilities
/// - ❌ Implement retry logic or backoff (a failure ends the run)
/// - ❌ Decide whether an update is needed (owned by `Reconciler`)
/// - ❌ Cache records between calls
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List every DNS record of a zone
    ///
    /// Pagination is handled inside the implementation; the returned
    /// vector is the complete zone in provider order.
    async fn list_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>, crate::Error>;

    /// Overwrite a record identified by `record.id`
    ///
    /// All fields of `record` are sent; callers build it with
    /// [`DnsRecord::with_content`].
    ///
    /// # Returns
    ///
    /// - `Ok(DnsRecord)`: The record as stored by the provider
    /// - `Err(Error)`: If the update failed
    async fn update_record(
        &self,
        zone_id: &str,
        record: &DnsRecord,
    ) -> Result<DnsRecord, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing DNS providers from configuration
pub trait DnsProviderFactory: Send + Sync {
    /// Create a DnsProvider instance from the loaded configuration
    fn create(
        &self,
        config: &crate::config::Config,
    ) -> Result<Box<dyn DnsProvider>, crate::Error>;
}
