//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `dispatch_solver=debug`.
const LOG_FILTER_ENV: &str = "DISPATCH_LOG";

fn main() {
    // Logs go to stderr so stdout carries only the plan JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = dispatch_cli::run() {
        #[expect(clippy::print_stderr, reason = "errors are reported to the terminal")]
        eprintln!("dispatch: {err}");
        std::process::exit(1);
    }
}
