//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();
    if let Err(err) = sharedpath_cli::run() {
        if let sharedpath_cli::CliError::ArgumentParsing(clap_err) = &err {
            // Clap prints help and version requests itself and picks the exit code.
            clap_err.exit();
        }
        report(&err);
        std::process::exit(1);
    }
}

/// Route `log` records to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber installed by an embedding host takes precedence.
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_err()
    {
        log::debug!("global subscriber already installed");
    }
}

#[expect(clippy::print_stderr, reason = "the CLI reports fatal errors on stderr")]
fn report(err: &sharedpath_cli::CliError) {
    eprintln!("sharedpath: {err}");
}
