//! CLI argument definitions.

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `syndicate`.
#[derive(Debug, Parser)]
#[command(name = "syndicate", version, about = "Publish posts to content silos from CI")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Syndicate the posts changed by the triggering commit.
    Run {
        /// Silo to target (repeatable). Falls back to the `INPUT_SILOS`
        /// Action input when omitted.
        #[arg(long = "silo", value_name = "NAME")]
        silos: Vec<String>,
        /// Commit silo-assigned ids back into post front matter.
        #[arg(long)]
        mark_as_syndicated: bool,
    },
}
