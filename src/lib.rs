//! Core library entry for the `syndicate` CLI.

pub mod actions;
pub mod adapters;
pub mod cli;
pub mod commands;
pub mod context;
pub mod dispatch;
pub mod marking;
pub mod ports;
pub mod post;
pub mod results;
pub mod silos;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli.command)
}
