//! Log subscriber construction
//!
//! The subscriber is built explicitly and handed to the caller, which
//! installs it as the scoped default for the run
//! (`tracing::subscriber::with_default`). Nothing here touches the global
//! dispatcher, so tests can install their own subscriber with an in-memory
//! writer.

use tracing::{Level, Subscriber};
use tracing_subscriber::fmt::MakeWriter;

/// Environment variable selecting the log level
pub const LOG_LEVEL_VAR: &str = "CF_DDNS_LOG_LEVEL";

/// Parse a log level name (`trace`, `debug`, `info`, `warn`, `error`)
pub fn parse_level(value: &str) -> Option<Level> {
    match value.trim().to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Build a formatting subscriber writing timestamped, level-prefixed lines
pub fn subscriber<W>(level: Level, ansi: bool, writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(ansi)
        .with_target(false)
        .with_writer(writer)
        .finish()
}
