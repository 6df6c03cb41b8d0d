//! Telemetry and tracing configuration.

mod tracing;

use anyhow::Context;

/// Filter used when `RUST_LOG` is not set.
pub(crate) const DEFAULT_FILTER: &str = "warn";

/// Initializes the tracing subscriber.
///
/// With `debug` set, the s3put targets are raised to `debug` on top of the
/// `RUST_LOG` (or default `warn`) filter.
///
/// # Errors
///
/// Returns an error if the tracing subscriber fails to initialize.
pub(crate) fn init_tracing(debug: bool) -> anyhow::Result<()> {
    tracing::init_tracing(debug).context("Failed to initialize tracing")
}
