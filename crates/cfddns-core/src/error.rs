//! Error types for the updater
//!
//! Every failure is fatal for the run: configuration problems are detected
//! before any network call, network and provider failures abort the run
//! where they happen.

use thiserror::Error;

/// Result type alias for updater operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the updater
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Public IP lookup failed (timeout, unreachable endpoint, bad response)
    #[error("Network error: {0}")]
    Network(String),

    /// The provider rejected the credentials
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The provider throttled the request
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Zone or record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other provider failure (transport, server error, API error)
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Provider response could not be decoded
    #[error("JSON error: {0}")]
    Json(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a decoding error
    pub fn json(msg: impl Into<String>) -> Self {
        Self::Json(msg.into())
    }

    /// Whether this error was raised while loading configuration
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
