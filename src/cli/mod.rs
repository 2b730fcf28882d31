//! CLI module for taskd
//!
//! - init: write default config and an empty store
//! - serve: boot and serve HTTP
//! - import: bulk-import the CSV file offline

mod args;
mod commands;
mod config;
mod errors;

pub use args::{Cli, Command, Overrides};
pub use commands::{import, init, run_command, serve};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args().command)
}
