//! Binary crate for the `wunder` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Verbose-only diagnostics on stderr
//! - Mapping failures to scripting-friendly exit codes

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt};

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cmd = cli::Cli::parse();

    if cmd.verbose {
        init_tracing();
    }
    tracing::debug!(?cmd, "Parsed CLI arguments");

    cmd.run().await
}

/// Install a stderr subscriber. Only called in verbose mode so status-bar runs stay silent.
///
/// Uses `RUST_LOG` if set, otherwise `debug` for our crates.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("wunder_cli=debug,wunder_core=debug"));

    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
