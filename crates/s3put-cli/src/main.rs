#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod app;
mod config;
mod report;
mod signal;
mod telemetry;

use std::process;

use s3put_core::{ObjectBody, Result};
use tokio_util::sync::CancellationToken;

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "s3put_cli::startup";
pub const TRACING_TARGET_CONFIG: &str = "s3put_cli::config";
pub const TRACING_TARGET_SIGNAL: &str = "s3put_cli::signal";
pub const TRACING_TARGET_UPLOAD: &str = "s3put_cli::upload";

#[tokio::main]
async fn main() {
    let cli = Cli::init();

    if let Err(error) = telemetry::init_tracing(cli.s3.debug) {
        eprintln!("Warning: {error:#}");
    }
    cli.log();

    let Err(error) = run(&cli).await else {
        process::exit(0);
    };

    report::log_failure(&error);
    eprintln!("{error}");

    // Exit without dropping the runtime: a blocked stdin read would keep it alive.
    process::exit(report::exit_code(error.kind));
}

/// Uploads standard input and prints the success line.
async fn run(cli: &Cli) -> Result<()> {
    let token = CancellationToken::new();
    tokio::spawn(signal::cancel_on_signal(token.clone()));

    let body = ObjectBody::from_reader(tokio::io::stdin());
    let output = app::execute(cli, body, token.clone()).await;
    token.cancel();

    println!("{}", report::success_message(&output?));
    Ok(())
}
