//! Command-line interface for the dispatch engine.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod fs;
mod solve;

pub use error::CliError;
use solve::{SolveArgs, run_solve};

const ARG_SOLVE_REQUEST: &str = "request-path";
const ARG_SOLVE_OSRM_BASE_URL: &str = "osrm-base-url";
const ARG_SOLVE_VEHICLE_PROFILE: &str = "vehicle-profile";
const ARG_SOLVE_TIMEOUT_SECS: &str = "timeout-secs";
const ARG_SOLVE_SERVICE_DATE: &str = "service-date";
const ENV_SOLVE_REQUEST: &str = "DISPATCH_CMDS_SOLVE_REQUEST_PATH";

/// Run the dispatch CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments, configuration or the request are
/// invalid, or when the solver cannot produce a plan.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Solve(args) => run_solve(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "dispatch",
    about = "Assign pending delivery orders to available couriers",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Solve a dispatch request and print the plan as JSON.
    Solve(SolveArgs),
}

#[cfg(test)]
mod tests;
