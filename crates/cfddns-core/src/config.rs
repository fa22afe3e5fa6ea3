//! Configuration for the updater
//!
//! All configuration comes from environment variables:
//!
//! - `CF_API_TOKEN` (required): Cloudflare API token
//! - `CF_ZONE_ID` (required): zone holding the records
//! - `CF_DNS_RECORD_NAMES` (required): comma-separated record names
//! - `CF_PUBLIC_IP_URL` (optional): public IP endpoint
//! - `CF_DDNS_MODE` (optional): `live` or `dry-run`

use crate::error::{Error, Result};
use std::collections::BTreeSet;

pub const API_TOKEN_VAR: &str = "CF_API_TOKEN";
pub const ZONE_ID_VAR: &str = "CF_ZONE_ID";
pub const RECORD_NAMES_VAR: &str = "CF_DNS_RECORD_NAMES";
pub const PUBLIC_IP_URL_VAR: &str = "CF_PUBLIC_IP_URL";
pub const MODE_VAR: &str = "CF_DDNS_MODE";

/// Endpoint returning the caller's public IPv4 address as plain text
pub const DEFAULT_PUBLIC_IP_URL: &str = "https://checkip.amazonaws.com";

/// Run mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Updates are sent to the provider
    #[default]
    Live,
    /// Records are listed but updates are only logged
    DryRun,
}

impl Mode {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "live" => Ok(Mode::Live),
            "dry-run" | "dry_run" | "dryrun" => Ok(Mode::DryRun),
            other => Err(Error::config(format!(
                "{} '{}' is not valid. Valid modes: live, dry-run",
                MODE_VAR, other
            ))),
        }
    }
}

/// Updater configuration
#[derive(Clone)]
pub struct Config {
    /// Bearer token for the provider API
    /// ⚠️ NEVER log this value
    pub api_token: String,

    /// Zone holding the managed records
    pub zone_id: String,

    /// Record names to manage, deduplicated
    pub record_names: BTreeSet<String>,

    /// URL of the public IP endpoint
    pub public_ip_url: String,

    /// Run mode
    pub mode: Mode,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .field("record_names", &self.record_names)
            .field("public_ip_url", &self.public_ip_url)
            .field("mode", &self.mode)
            .finish()
    }
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Values that are unset or blank are treated the same. Required
    /// values are checked in a fixed order (token, zone, names) and the
    /// first missing one is reported.
    pub fn from_lookup<L>(lookup: L) -> Result<Self>
    where
        L: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| Error::config(format!("{} environment variable not set", key)))
        };

        let api_token = require(API_TOKEN_VAR)?;
        let zone_id = require(ZONE_ID_VAR)?;

        let record_names = parse_record_names(&require(RECORD_NAMES_VAR)?);
        if record_names.is_empty() {
            return Err(Error::config(format!(
                "{} contains no record names",
                RECORD_NAMES_VAR
            )));
        }

        let public_ip_url = match get(PUBLIC_IP_URL_VAR) {
            Some(url) => {
                let url = url.trim().to_string();
                if !url.starts_with("https://") && !url.starts_with("http://") {
                    return Err(Error::config(format!(
                        "{} must use HTTP or HTTPS scheme. Got: {}",
                        PUBLIC_IP_URL_VAR, url
                    )));
                }
                url
            }
            None => DEFAULT_PUBLIC_IP_URL.to_string(),
        };

        let mode = match get(MODE_VAR) {
            Some(value) => Mode::parse(&value)?,
            None => Mode::default(),
        };

        Ok(Self {
            api_token,
            zone_id,
            record_names,
            public_ip_url,
            mode,
        })
    }

    /// Whether updates should only be logged
    pub fn is_dry_run(&self) -> bool {
        self.mode == Mode::DryRun
    }
}

/// Split a comma-separated record list into a set of names
pub fn parse_record_names(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
