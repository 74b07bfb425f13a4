//! Logging setup for binaries and long-running checks.
//!
//! The library itself only emits `tracing` events; installing a subscriber
//! is left to the caller.

use crate::error::CheckerError;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Install a global fmt subscriber filtered by `RUST_LOG` (default `info`).
/// With `json` set, events are written as JSON lines.
pub fn init_tracing(json: bool) -> Result<(), CheckerError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| CheckerError::Logging(e.to_string()))
}
