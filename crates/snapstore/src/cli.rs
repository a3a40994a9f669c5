//! Command line arguments for the `snapstore` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Operator CLI for snapshot artifacts.
#[derive(Debug, Parser)]
#[command(
    name = "snapstore",
    version,
    about = "Inspect and validate snapshot artifacts",
    after_help = "Logging is controlled through RUST_LOG (default: warn)."
)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List snapshot ids stored in an artifact
    List {
        /// Artifact to read
        artifact: PathBuf,
        /// Regex the unescaped id must match
        #[arg(long)]
        filter: Option<String>,
    },
    /// Print one stored snapshot
    Show {
        /// Artifact to read
        artifact: PathBuf,
        /// Unescaped snapshot id, e.g. "adds numbers 1"
        #[arg(allow_hyphen_values = true)]
        id: String,
        /// Print the stored (escaped) text unchanged
        #[arg(long)]
        raw: bool,
    },
    /// Validate artifacts and report entry counts
    Check {
        /// Artifacts to validate
        #[arg(required = true)]
        artifacts: Vec<PathBuf>,
    },
}
