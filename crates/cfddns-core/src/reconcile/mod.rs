//! Record reconciliation
//!
//! The Reconciler is responsible for:
//! - Resolving the public IP via IpSource
//! - Listing the zone's records via DnsProvider
//! - Rewriting every managed A record whose content is stale
//! - Reporting configured names that do not exist remotely
//!
//! ## Flow
//!
//! ```text
//! ┌─────────────┐   public IP   ┌──────────────┐   list / update   ┌─────────────┐
//! │  IpSource   │ ────────────▶ │  Reconciler  │ ◀───────────────▶ │ DnsProvider │
//! └─────────────┘               └──────────────┘                   └─────────────┘
//!                                      │
//!                                      ▼
//!                               ReconcileReport
//! ```
//!
//! ## Per-record decision
//!
//! 1. Skip unless the record is an `A` record with a configured name
//! 2. Mark the name as found
//! 3. Skip if the content already equals the public IP
//! 4. Otherwise update, carrying every other field forward
//!
//! Records are processed once each, in provider order. The first failed
//! update aborts the run; records updated before it stay updated.

use crate::config::Config;
use crate::error::Result;
use crate::traits::{DnsProvider, DnsProviderFactory, DnsRecord, IpSource, IpSourceFactory};
use std::collections::BTreeSet;
use tracing::{debug, error, info, warn};

/// Outcome of a completed reconciliation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// The public IP the records were reconciled against
    pub public_ip: String,

    /// Configured names that matched at least one remote A record
    pub found: BTreeSet<String>,

    /// Configured names with no remote A record
    pub missing: BTreeSet<String>,

    /// Records rewritten in this run, as returned by the provider
    /// (in dry-run mode, the records that would have been rewritten)
    pub updated: Vec<DnsRecord>,

    /// Names of managed records whose content was already current
    pub unchanged: Vec<String>,

    /// Number of remote records ignored by the filter
    pub skipped: usize,
}

impl ReconcileReport {
    fn new(public_ip: String) -> Self {
        Self {
            public_ip,
            ..Self::default()
        }
    }
}

/// Reconciles one zone's A records against the public IP
pub struct Reconciler {
    /// Public IP resolver
    ip_source: Box<dyn IpSource>,

    /// DNS provider for listing and updating records
    provider: Box<dyn DnsProvider>,

    /// Zone holding the records
    zone_id: String,

    /// Record names to manage
    record_names: BTreeSet<String>,

    /// Updates are only logged by the provider
    dry_run: bool,
}

impl Reconciler {
    /// Create a reconciler for the zone and names in `config`
    pub fn new(
        ip_source: Box<dyn IpSource>,
        provider: Box<dyn DnsProvider>,
        config: &Config,
    ) -> Self {
        Self {
            ip_source,
            provider,
            zone_id: config.zone_id.clone(),
            record_names: config.record_names.clone(),
            dry_run: config.is_dry_run(),
        }
    }

    /// Whether a remote record is one this run manages
    pub fn is_managed(&self, record: &DnsRecord) -> bool {
        record.is_a_record() && self.record_names.contains(&record.name)
    }

    /// Run one reconciliation pass
    ///
    /// # Returns
    ///
    /// - `Ok(ReconcileReport)`: Every record was processed
    /// - `Err(Error)`: The IP lookup, the listing or an update failed
    pub async fn run(&self) -> Result<ReconcileReport> {
        let provider_name = self.provider.provider_name();

        info!("Getting public IP from {} ...", self.ip_source.endpoint());
        let public_ip = self.ip_source.current().await?;
        info!("Public IP: {}", public_ip);

        info!("Getting DNS records from {} ...", provider_name);
        let records = self.provider.list_records(&self.zone_id).await?;
        debug!("Zone {} holds {} record(s)", self.zone_id, records.len());

        let mut report = ReconcileReport::new(public_ip);

        info!("Updating DNS records ...");
        for record in records {
            if !self.is_managed(&record) {
                info!("Skipping '{}', type = '{}'", record.name, record.record_type);
                report.skipped += 1;
                continue;
            }

            report.found.insert(record.name.clone());

            if record.content == report.public_ip {
                info!(
                    "Skipping '{}', value already equal to '{}'",
                    record.name, report.public_ip
                );
                report.unchanged.push(record.name);
                continue;
            }

            let desired = record.with_content(report.public_ip.as_str());
            match self.provider.update_record(&self.zone_id, &desired).await {
                Ok(updated) if self.dry_run => {
                    info!(
                        "[DRY-RUN] DNS record for '{}' would be updated to '{}'",
                        updated.name, updated.content
                    );
                    report.updated.push(updated);
                }
                Ok(updated) => {
                    info!(
                        "DNS record for '{}' updated to '{}'",
                        updated.name, updated.content
                    );
                    report.updated.push(updated);
                }
                Err(e) => {
                    warn!(
                        "Aborting at '{}' (was '{}'); {} record(s) already updated in this run keep their new value",
                        record.name,
                        record.content,
                        report.updated.len()
                    );
                    return Err(e);
                }
            }
        }

        report.missing = self
            .record_names
            .difference(&report.found)
            .cloned()
            .collect();

        if report.missing.is_empty() {
            info!("All specified DNS records exist in {}.", provider_name);
        } else {
            let missing: Vec<&str> = report.missing.iter().map(String::as_str).collect();
            warn!(
                "The following DNS records do not exist in {}: {:?}",
                provider_name, missing
            );
        }

        Ok(report)
    }
}

/// Load configuration, build the clients and run one reconciliation
///
/// Configuration is loaded before either factory is called, so a
/// configuration error never reaches the network. Any failure is logged
/// once at error level before being returned.
pub async fn run<L>(
    lookup: L,
    ip_sources: &dyn IpSourceFactory,
    providers: &dyn DnsProviderFactory,
) -> Result<ReconcileReport>
where
    L: Fn(&str) -> Option<String>,
{
    run_inner(lookup, ip_sources, providers)
        .await
        .inspect_err(|e| error!("{}", e))
}

async fn run_inner<L>(
    lookup: L,
    ip_sources: &dyn IpSourceFactory,
    providers: &dyn DnsProviderFactory,
) -> Result<ReconcileReport>
where
    L: Fn(&str) -> Option<String>,
{
    let config = Config::from_lookup(lookup)?;
    debug!("Configuration loaded: {:?}", config);
    info!(
        "Managing {} record name(s) in zone {}",
        config.record_names.len(),
        config.zone_id
    );

    let provider = providers.create(&config)?;
    info!("Logging in to {} ...", provider.provider_name());
    let ip_source = ip_sources.create(&config)?;

    Reconciler::new(ip_source, provider, &config).run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedIp;

    #[async_trait]
    impl IpSource for FixedIp {
        async fn current(&self) -> Result<String> {
            Ok("203.0.113.5".to_string())
        }

        fn endpoint(&self) -> &str {
            "test"
        }
    }

    struct NoRecords;

    #[async_trait]
    impl DnsProvider for NoRecords {
        async fn list_records(&self, _zone_id: &str) -> Result<Vec<DnsRecord>> {
            Ok(Vec::new())
        }

        async fn update_record(&self, _zone_id: &str, record: &DnsRecord) -> Result<DnsRecord> {
            Ok(record.clone())
        }

        fn provider_name(&self) -> &'static str {
            "test"
        }
    }

    fn reconciler(names: &[&str]) -> Reconciler {
        let config = Config {
            api_token: "token".to_string(),
            zone_id: "zone".to_string(),
            record_names: names.iter().map(|n| n.to_string()).collect(),
            public_ip_url: crate::config::DEFAULT_PUBLIC_IP_URL.to_string(),
            mode: crate::config::Mode::Live,
        };
        Reconciler::new(Box::new(FixedIp), Box::new(NoRecords), &config)
    }

    fn record(name: &str, record_type: &str) -> DnsRecord {
        DnsRecord {
            id: format!("id-{}", name),
            name: name.to_string(),
            record_type: record_type.to_string(),
            content: "198.51.100.1".to_string(),
            ttl: 1,
            proxied: None,
        }
    }

    #[test]
    fn filter_requires_a_type_and_configured_name() {
        let r = reconciler(&["a.example.com"]);

        assert!(r.is_managed(&record("a.example.com", "A")));
        assert!(!r.is_managed(&record("a.example.com", "AAAA")));
        assert!(!r.is_managed(&record("a.example.com", "CNAME")));
        assert!(!r.is_managed(&record("b.example.com", "A")));
    }

    #[tokio::test]
    async fn empty_zone_reports_everything_missing() {
        let r = reconciler(&["a.example.com", "b.example.com"]);
        let report = r.run().await.unwrap();

        assert_eq!(report.public_ip, "203.0.113.5");
        assert!(report.found.is_empty());
        assert_eq!(report.missing.len(), 2);
        assert!(report.updated.is_empty());
    }
}
