//! Test doubles and common utilities for contract tests
//!
//! The doubles keep their counters behind `Arc`s so a test can hand one
//! instance to the reconciler and keep another to inspect afterwards.

#![allow(dead_code)]

use cfddns_core::config::{Config, DEFAULT_PUBLIC_IP_URL, Mode};
use cfddns_core::error::{Error, Result};
use cfddns_core::traits::{DnsProvider, DnsProviderFactory, DnsRecord, IpSource, IpSourceFactory};
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

/// An IpSource returning a fixed value (or a fixed failure)
pub struct StaticIpSource {
    ip: Option<String>,
    call_count: Arc<AtomicUsize>,
}

impl StaticIpSource {
    pub fn new(ip: &str) -> Self {
        Self {
            ip: Some(ip.to_string()),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A source whose lookup always times out
    pub fn failing() -> Self {
        Self {
            ip: None,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times current() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Create a new StaticIpSource that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            ip: other.ip.clone(),
            call_count: Arc::clone(&other.call_count),
        }
    }
}

#[async_trait::async_trait]
impl IpSource for StaticIpSource {
    async fn current(&self) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.ip
            .clone()
            .ok_or_else(|| Error::network("Request to test endpoint timed out"))
    }

    fn endpoint(&self) -> &str {
        "static"
    }
}

/// An in-memory zone that applies updates to its own records
pub struct MockDnsProvider {
    /// Records of the zone, in listing order
    records: Arc<Mutex<Vec<DnsRecord>>>,
    /// Every record passed to update_record(), in call order
    updates: Arc<Mutex<Vec<DnsRecord>>>,
    /// Call counter for list_records()
    list_call_count: Arc<AtomicUsize>,
    /// 1-based index of the update call that fails, if any
    fail_on_update: Option<usize>,
    /// Whether list_records() fails
    fail_listing: bool,
}

impl MockDnsProvider {
    pub fn new(records: Vec<DnsRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            updates: Arc::new(Mutex::new(Vec::new())),
            list_call_count: Arc::new(AtomicUsize::new(0)),
            fail_on_update: None,
            fail_listing: false,
        }
    }

    /// Make the `n`th update call (1-based) fail
    pub fn failing_update(mut self, n: usize) -> Self {
        self.fail_on_update = Some(n);
        self
    }

    /// Make listing fail with an authentication error
    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    /// Records passed to update_record() so far
    pub fn updates(&self) -> Vec<DnsRecord> {
        self.updates.lock().unwrap().clone()
    }

    /// Get the number of times update_record() was called
    pub fn update_call_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }

    /// Get the number of times list_records() was called
    pub fn list_call_count(&self) -> usize {
        self.list_call_count.load(Ordering::SeqCst)
    }

    /// Current state of the zone
    pub fn records(&self) -> Vec<DnsRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Create a new MockDnsProvider that shares state with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            records: Arc::clone(&other.records),
            updates: Arc::clone(&other.updates),
            list_call_count: Arc::clone(&other.list_call_count),
            fail_on_update: other.fail_on_update,
            fail_listing: other.fail_listing,
        }
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn list_records(&self, _zone_id: &str) -> Result<Vec<DnsRecord>> {
        self.list_call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing {
            return Err(Error::auth("Invalid API token"));
        }
        Ok(self.records.lock().unwrap().clone())
    }

    async fn update_record(&self, _zone_id: &str, record: &DnsRecord) -> Result<DnsRecord> {
        let call = {
            let mut updates = self.updates.lock().unwrap();
            updates.push(record.clone());
            updates.len()
        };

        if self.fail_on_update == Some(call) {
            return Err(Error::provider("mock", "update rejected"));
        }

        let mut records = self.records.lock().unwrap();
        if let Some(stored) = records.iter_mut().find(|r| r.id == record.id) {
            *stored = record.clone();
        }
        Ok(record.clone())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Factory handing out StaticIpSources that share counters
pub struct MockIpSourceFactory {
    pub source: StaticIpSource,
    create_count: Arc<AtomicUsize>,
}

impl MockIpSourceFactory {
    pub fn new(source: StaticIpSource) -> Self {
        Self {
            source,
            create_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn create_count(&self) -> usize {
        self.create_count.load(Ordering::SeqCst)
    }
}

impl IpSourceFactory for MockIpSourceFactory {
    fn create(&self, _config: &Config) -> Result<Box<dyn IpSource>> {
        self.create_count.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(StaticIpSource::sharing_counters_with(&self.source)))
    }
}

/// Factory handing out MockDnsProviders that share state
pub struct MockProviderFactory {
    pub provider: MockDnsProvider,
    create_count: Arc<AtomicUsize>,
}

impl MockProviderFactory {
    pub fn new(provider: MockDnsProvider) -> Self {
        Self {
            provider,
            create_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn create_count(&self) -> usize {
        self.create_count.load(Ordering::SeqCst)
    }
}

impl DnsProviderFactory for MockProviderFactory {
    fn create(&self, _config: &Config) -> Result<Box<dyn DnsProvider>> {
        self.create_count.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockDnsProvider::sharing_counters_with(&self.provider)))
    }
}

/// In-memory log sink
#[derive(Clone, Default)]
pub struct CapturedLogs {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a capturing subscriber as this thread's default
    pub fn install(&self) -> DefaultGuard {
        let subscriber = cfddns_core::logging::subscriber(tracing::Level::INFO, false, self.clone());
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
    }

    /// Lines containing the given level marker ("INFO", "WARN", "ERROR")
    pub fn lines_at(&self, level: &str) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.contains(level))
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Helper to build a remote record
pub fn record(id: &str, name: &str, record_type: &str, content: &str) -> DnsRecord {
    DnsRecord {
        id: id.to_string(),
        name: name.to_string(),
        record_type: record_type.to_string(),
        content: content.to_string(),
        ttl: 300,
        proxied: Some(false),
    }
}

/// Helper to create a minimal Config for testing
pub fn config(names: &[&str]) -> Config {
    Config {
        api_token: "test-token".to_string(),
        zone_id: "test-zone".to_string(),
        record_names: names.iter().map(|n| n.to_string()).collect(),
        public_ip_url: DEFAULT_PUBLIC_IP_URL.to_string(),
        mode: Mode::Live,
    }
}

/// Environment lookup backed by a fixed set of variables
pub fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}
