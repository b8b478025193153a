//! CLI module for Autotile.
//!
//! The command line exposes the layout calculators, scenario replay against
//! the in-memory host, configuration inspection and schema output.

mod commands;
mod output;
mod scenario;

use clap::Parser;
pub use commands::Cli;
pub use scenario::{ReplayOutcome, Scenario, ScenarioEvent, load_scenario, replay};
use tracing_subscriber::EnvFilter;

use crate::error::AutotileError;

/// Returns the log filter for a `-v` count, unless `RUST_LOG` overrides it.
fn log_filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match verbosity {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        };
        EnvFilter::new(level)
    })
}

/// Installs the global tracing subscriber, writing to stderr.
fn init_tracing(verbosity: u8) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if let Err(err) = result {
        eprintln!("autotile: warning: failed to initialize logging: {err}");
    }
}

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), AutotileError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    cli.execute()
}
