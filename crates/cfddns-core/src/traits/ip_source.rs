// # IP Source Trait
//
// Defines the interface for resolving the caller's public IP address.
//
// ## Implementations
//
// - HTTP endpoint (checkip.amazonaws.com by default): `cfddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use cfddns_core::IpSource;
//
// let source = /* IpSource implementation */;
// let public_ip = source.current().await?;
// ```

use async_trait::async_trait;

/// Trait for public IP resolvers
///
/// The returned value is the text the resolver received, with surrounding
/// whitespace removed. It is compared verbatim with record content and is
/// not parsed as an address.
///
/// # Trust Level: Untrusted
///
/// Resolvers make exactly one outbound request per call and never retry.
/// A failure is returned as [`crate::Error::Network`] and ends the run.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Resolve the current public IP
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The public IP as text
    /// - `Err(Error)`: If the endpoint timed out, was unreachable or
    ///   answered with an error
    async fn current(&self) -> Result<String, crate::Error>;

    /// Where the IP is resolved from (for logging)
    fn endpoint(&self) -> &str;
}

/// Helper trait for constructing IP sources from configuration
pub trait IpSourceFactory: Send + Sync {
    /// Create an IpSource instance from the loaded configuration
    fn create(&self, config: &crate::config::Config) -> Result<Box<dyn IpSource>, crate::Error>;
}
