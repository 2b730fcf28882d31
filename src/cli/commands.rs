//! CLI command implementations
//!
//! Boot order for `serve`: load config, open the store (which reads or
//! creates the backing file), build the route table, bind, serve.

use std::path::Path;
use std::sync::Arc;

use super::args::{Command, Overrides};
use super::config::Config;
use super::errors::{CliError, CliResult};
use crate::csv_import::CsvSource;
use crate::http_server::{import_csv, HttpServer, TaskState};
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::store::TaskStore;

/// Run a parsed command on a fresh tokio runtime
pub fn run_command(command: Command) -> CliResult<()> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to start runtime: {}", e)))?;

    runtime.block_on(async move {
        match command {
            Command::Init { config } => init(&config).await,
            Command::Serve { config, overrides } => serve(&config, &overrides).await,
            Command::Import { config, overrides } => {
                let imported = import(&config, &overrides).await?;
                println!("imported {} tasks", imported);
                Ok(())
            }
        }
    })
}

fn load_config(config_path: &Path, overrides: &Overrides) -> CliResult<Config> {
    let config = Config::load(config_path)?.with_overrides(overrides)?;
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("config", &config_path.display().to_string()),
            ("db_path", &config.db_path.display().to_string()),
        ],
    );
    Ok(config)
}

async fn open_store(config: &Config) -> CliResult<Arc<TaskStore>> {
    let store = TaskStore::open(&config.db_path, config.on_corrupt).await?;
    Ok(Arc::new(store))
}

/// Write a default config (unless one exists) and an empty store file
pub async fn init(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;

    if config.db_path.exists() {
        return Err(CliError::already_initialized(config.db_path.display()));
    }
    if !config_path.exists() {
        config.write(config_path)?;
    }

    open_store(&config).await?;
    Ok(())
}

/// Boot and serve until interrupted
pub async fn serve(config_path: &Path, overrides: &Overrides) -> CliResult<()> {
    log_event(Event::BootStart);

    let config = load_config(config_path, overrides)?;
    let store = open_store(&config).await?;
    let tasks = Arc::new(TaskState::new(store, CsvSource::new(&config.csv_path)));

    let server = HttpServer::new(config.server.clone(), tasks)?;
    server
        .start()
        .await
        .map_err(|e| CliError::boot_failed(format!("Server failed: {}", e)))
}

/// Import the configured CSV file into the store. Returns the row count.
pub async fn import(config_path: &Path, overrides: &Overrides) -> CliResult<usize> {
    let config = load_config(config_path, overrides)?;
    let store = open_store(&config).await?;

    let imported = import_csv(&store, &CsvSource::new(&config.csv_path)).await?;
    Ok(imported)
}
