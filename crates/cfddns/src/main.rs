// # cfddns - one-shot Cloudflare DDNS updater
//
// Resolves the public IPv4 address once, rewrites every configured A record
// of one Cloudflare zone that holds a different value, and exits.
//
// This binary is a THIN integration layer: it builds the log subscriber,
// the runtime and the concrete clients. All reconciliation logic lives in
// cfddns-core.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// - `CF_API_TOKEN` (required): Cloudflare API token
// - `CF_ZONE_ID` (required): Zone ID holding the records
// - `CF_DNS_RECORD_NAMES` (required): Comma-separated list of record names
// - `CF_PUBLIC_IP_URL`: Public IP endpoint (default: https://checkip.amazonaws.com)
// - `CF_DDNS_MODE`: `live` (default) or `dry-run`
// - `CF_DDNS_LOG_LEVEL`: trace, debug, info (default), warn, error
//
// ## Example
//
// ```bash
// export CF_API_TOKEN=your_token
// export CF_ZONE_ID=023e105f4ecef8ad9ca31a8372d0c353
// export CF_DNS_RECORD_NAMES=home.example.com,vpn.example.com
//
// cfddns
// ```

use anyhow::{Context, Result};
use cfddns_core::logging::{self, LOG_LEVEL_VAR};
use cfddns_ip_http::HttpIpSourceFactory;
use cfddns_provider_cloudflare::CloudflareFactory;
use std::env;
use std::io::{self, IsTerminal};
use std::process::ExitCode;
use tracing::{Level, error, warn};

/// Exit codes for different termination scenarios
///
/// - 0: All records reconciled
/// - 1: Configuration error
/// - 2: Runtime error (network or provider failure)
#[derive(Debug, Clone, Copy)]
enum CfddnsExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<CfddnsExitCode> for ExitCode {
    fn from(code: CfddnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    let requested_level = env::var(LOG_LEVEL_VAR).ok();
    let level = requested_level
        .as_deref()
        .and_then(logging::parse_level)
        .unwrap_or(Level::INFO);

    let subscriber = logging::subscriber(level, io::stdout().is_terminal(), io::stdout);

    tracing::subscriber::with_default(subscriber, || {
        if let Some(value) = requested_level.filter(|v| logging::parse_level(v).is_none()) {
            warn!(
                "{} '{}' is not valid, using info. Valid levels: trace, debug, info, warn, error",
                LOG_LEVEL_VAR, value
            );
        }

        run_once().into()
    })
}

/// Run a single reconciliation on a single-threaded runtime
fn run_once() -> CfddnsExitCode {
    let runtime = match build_runtime() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("{:#}", e);
            return CfddnsExitCode::RuntimeError;
        }
    };

    let result = runtime.block_on(cfddns_core::run(
        |key| env::var(key).ok(),
        &HttpIpSourceFactory,
        &CloudflareFactory,
    ));

    // Failures were already logged by cfddns_core::run
    match result {
        Ok(_) => CfddnsExitCode::Success,
        Err(e) if e.is_config() => CfddnsExitCode::ConfigError,
        Err(_) => CfddnsExitCode::RuntimeError,
    }
}

fn build_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")
}
