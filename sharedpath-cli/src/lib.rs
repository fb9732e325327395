//! Command-line interface for shared two-traveler journey planning.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};
use serde::Serialize;

mod check;
mod error;
mod provider;
mod request;
mod search;

pub use error::CliError;

use check::{CheckArgs, run_check};
use search::{SearchArgs, run_search};

const ARG_REQUEST: &str = "request";
const ARG_OSRM_BASE_URL: &str = "osrm-base-url";
const ARG_METRICS: &str = "metrics";
const ARG_STRATEGY: &str = "strategy";
const ARG_MAX_STOPS: &str = "max-stops";
const ENV_SEARCH_REQUEST: &str = "SHAREDPATH_CMDS_SEARCH_REQUEST_PATH";
const ENV_CHECK_REQUEST: &str = "SHAREDPATH_CMDS_CHECK_REQUEST_PATH";

/// Run the CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when argument parsing, configuration, request
/// loading, metric retrieval, search or output fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Search(args) => run_search(args),
        Command::Check(args) => run_check(args),
    }
}

/// Write `value` as pretty JSON followed by a newline.
fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[derive(Debug, Parser)]
#[command(
    name = "sharedpath",
    about = "Plan one shared journey that serves two travelers' stops",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Find every cheapest merge of both travelers' stops.
    Search(SearchArgs),
    /// Compute the timeline of one ordering against both time windows.
    Check(CheckArgs),
}

#[cfg(test)]
mod tests;
