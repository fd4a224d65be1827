//! Binary crate for the `runlayers` job.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and environment overrides
//! - Interactive configuration
//! - Logging setup and the process exit status

use clap::Parser;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    // load .env if present
    dotenvy::dotenv().ok();
    let cmd = cli::Cli::parse();

    let default_level = if cmd.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    match cmd.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Weather job failed: {err:#}");
            ExitCode::FAILURE
        }
    }
}
