//! Tracing initialization and configuration.

use std::io::{self, IsTerminal};

use anyhow::Context;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use super::DEFAULT_FILTER;

/// Targets raised to `debug` by `--debug`.
const DEBUG_TARGETS: &[&str] = &[
    "s3put_cli",
    "s3put_core",
    "s3put_aws",
    "aws_sdk_s3",
    "aws_smithy_runtime",
];

/// Initializes the tracing subscriber for structured logging on stderr.
///
/// # Configuration
///
/// The log level can be configured via the `RUST_LOG` environment variable.
/// If not set, defaults to `warn` level.
///
/// ```bash
/// RUST_LOG=s3put_aws=trace,aws_smithy_runtime=trace s3put -b alice -k sample.txt ...
/// ```
///
/// # Errors
///
/// Returns an error if the tracing subscriber fails to initialize.
pub(super) fn init_tracing(debug: bool) -> anyhow::Result<()> {
    let env_filter = create_env_filter(debug)?;

    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true)
        .with_ansi(io::stderr().is_terminal());

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    Ok(())
}

/// Creates an environment filter for tracing.
fn create_env_filter(debug: bool) -> anyhow::Result<EnvFilter> {
    let mut filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .map_err(|e| anyhow::anyhow!("Failed to create env filter: {e}"))?;

    if debug {
        for target in DEBUG_TARGETS {
            let directive: Directive = format!("{target}=debug")
                .parse()
                .with_context(|| format!("invalid filter directive for '{target}'"))?;
            filter = filter.add_directive(directive);
        }
    }

    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_adds_crate_directives() {
        let filter = create_env_filter(true).unwrap().to_string();
        for target in DEBUG_TARGETS {
            assert!(filter.contains(&format!("{target}=debug")));
        }
    }
}
