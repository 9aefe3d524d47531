//! Binary entrypoint for the `syndicate` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // Pick up local credentials when run outside CI.
    dotenvy::dotenv().ok();
    match syndicate::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
