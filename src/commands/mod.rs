//! Command dispatch and handlers.

pub mod run;

use std::env;

use crate::cli::Command;
use crate::context::ServiceContext;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    match command {
        Command::Run { silos, mark_as_syndicated } => {
            let ctx = ServiceContext::live()?;
            let silos = if silos.is_empty() { silos_from_env() } else { silos.clone() };
            let mark = *mark_as_syndicated || mark_from_env()?;
            run::run(&ctx, &silos, mark)
        }
    }
}

/// Reads the newline-separated `INPUT_SILOS` Action input, if set.
fn silos_from_env() -> Vec<String> {
    env::var("INPUT_SILOS").map_or_else(
        |_| Vec::new(),
        |value| {
            value
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect()
        },
    )
}

/// Reads the JSON-boolean `INPUT_MARK_AS_SYNDICATED` Action input.
fn mark_from_env() -> Result<bool, String> {
    match env::var("INPUT_MARK_AS_SYNDICATED") {
        Ok(value) => serde_json::from_str(&value)
            .map_err(|e| format!("INPUT_MARK_AS_SYNDICATED is not a JSON boolean: {e}")),
        Err(_) => Ok(false),
    }
}
