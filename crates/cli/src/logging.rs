//! Log output for the CLI
//!
//! Logs go to stderr so generated modules on stdout stay clean.
//! `RUST_LOG` wins over the verbosity flags when set.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Default filter directive for a `-v` count
fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

pub fn init(verbose: u8) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
        .context("failed to install log subscriber")
}
