//! GitHub Actions workflow-command output.
//!
//! Everything this crate tells the outside world goes through the Actions
//! log surface: plain lines for progress, `::warning::`/`::error::` for
//! things a human should see in the run summary, `::group::` to fold each
//! silo's chatter, and `::set-output` for values consumed by later
//! workflow steps.

use std::fmt::Display;

/// Logs a plain progress line.
pub fn log(msg: impl Display) {
    println!("{msg}");
}

/// Logs a debug line, hidden unless the runner has debug logging enabled.
pub fn debug(msg: impl Display) {
    println!("::debug::{msg}");
}

/// Emits a warning annotation.
pub fn warn(msg: impl Display) {
    println!("::warning::{msg}");
}

/// Emits an error annotation.
pub fn error(msg: impl Display) {
    println!("::error::{msg}");
}

/// Emits a step output consumable by later workflow steps.
pub fn set_output(key: &str, value: impl Display) {
    println!("::set-output name={key}::{value}");
}

/// Opens a collapsible log group. Pair with [`group_end`].
pub fn group_start(title: &str) {
    println!("::group::{title}");
}

/// Closes the current collapsible log group.
pub fn group_end() {
    println!("::endgroup::");
}
