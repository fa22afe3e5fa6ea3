//! Core traits for the updater
//!
//! This module defines the seams between the reconciliation logic and the
//! outside world.
//!
//! - [`IpSource`]: Resolve the current public IP
//! - [`DnsProvider`]: List and update DNS records via provider APIs

pub mod ip_source;
pub mod dns_provider;

pub use ip_source::{IpSource, IpSourceFactory};
pub use dns_provider::{DnsProvider, DnsProviderFactory, DnsRecord};
