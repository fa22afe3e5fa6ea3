// # cfddns-core
//
// Core library for the Cloudflare dynamic DNS updater.
//
// ## Architecture Overview
//
// One run resolves the public IP once and reconciles one zone's A records
// against it:
// - **IpSource**: Trait for resolving the current public IP
// - **DnsProvider**: Trait for listing and updating DNS records
// - **Reconciler**: Compares remote records with the public IP and rewrites stale ones
// - **Config**: Environment-driven configuration
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Reconciliation logic is separate from HTTP clients
// 2. **Fail Fast**: Configuration is complete before any network call
// 3. **No Hidden Retries**: Every failure ends the run
// 4. **Injected Logging**: Subscribers are built by the caller, never installed globally here

pub mod config;
pub mod error;
pub mod logging;
pub mod reconcile;
pub mod traits;

// Re-export core types for convenience
pub use config::{Config, Mode};
pub use error::{Error, Result};
pub use reconcile::{ReconcileReport, Reconciler, run};
pub use traits::{DnsProvider, DnsProviderFactory, DnsRecord, IpSource, IpSourceFactory};
