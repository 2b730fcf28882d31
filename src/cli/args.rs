//! CLI argument definitions using clap
//!
//! Commands:
//! - taskd init --config <path>
//! - taskd serve --config <path> [--port <n>] [--db <path>] [--csv <path>]
//! - taskd import --config <path> [--db <path>] [--csv <path>]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// taskd - a small file-backed task tracking service
#[derive(Parser, Debug)]
#[command(name = "taskd")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default config and an empty store file
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./taskd.json")]
        config: PathBuf,
    },

    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./taskd.json")]
        config: PathBuf,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// Import the CSV file into the store and exit
    Import {
        /// Path to configuration file
        #[arg(long, default_value = "./taskd.json")]
        config: PathBuf,

        #[command(flatten)]
        overrides: Overrides,
    },
}

/// Flags that take precedence over the config file
#[derive(Args, Debug, Clone, Default)]
pub struct Overrides {
    /// Port to listen on
    #[arg(long)]
    pub port: Option<u16>,

    /// Store file path
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// CSV file used by bulk import
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_with_overrides() {
        let cli = Cli::try_parse_from(["taskd", "serve", "--port", "9000", "--db", "/tmp/db.json"])
            .unwrap();

        match cli.command {
            Command::Serve { config, overrides } => {
                assert_eq!(config, PathBuf::from("./taskd.json"));
                assert_eq!(overrides.port, Some(9000));
                assert_eq!(overrides.db, Some(PathBuf::from("/tmp/db.json")));
                assert_eq!(overrides.csv, None);
            }
            other => panic!("expected serve, got {:?}", other),
        }
    }

    #[test]
    fn test_import_command() {
        let cli = Cli::try_parse_from(["taskd", "import", "--csv", "tasks.csv"]).unwrap();
        assert!(matches!(cli.command, Command::Import { .. }));
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(Cli::try_parse_from(["taskd", "explode"]).is_err());
    }
}
