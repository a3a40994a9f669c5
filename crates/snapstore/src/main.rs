//! # snapstore
//!
//! Operator CLI for snapshot artifacts.
//!
//! ## Overview
//!
//! This binary provides commands for:
//! - Listing the snapshot ids stored in an artifact
//! - Printing a single stored snapshot
//! - Validating artifacts before they are committed
//!
//! ## Architecture
//!
//! This is Layer 4 - the operator binary on top of:
//! - snapstore-core: Errors and escaping
//! - snapstore-format: Artifact parsing
//! - snapstore-manager: Snapshot files

use std::io;
use std::process::ExitCode;

use clap::Parser;
use snapstore::cli::Cli;
use snapstore::commands;

fn main() -> anyhow::Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    // Exits with status 2 on usage errors
    let cli = Cli::parse();
    tracing::debug!("Running {:?}", cli.command);

    let stdout = io::stdout();
    let ok = commands::run(&cli.command, &mut stdout.lock())?;

    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
