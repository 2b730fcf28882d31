//! Service configuration file
//!
//! JSON, every field optional:
//!
//! ```json
//! { "host": "127.0.0.1", "port": 3333, "cors_origins": [],
//!   "db_path": "./db.json", "csv_path": "./data.csv", "on_corrupt": "fail" }
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::args::Overrides;
use super::errors::{CliError, CliResult};
use crate::http_server::HttpServerConfig;
use crate::store::CorruptPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub server: HttpServerConfig,

    /// Store file (default "./db.json")
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// CSV file read by bulk import (default "./data.csv")
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,

    /// What to do with an unparseable store file (default "fail")
    #[serde(default)]
    pub on_corrupt: CorruptPolicy,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./db.json")
}

fn default_csv_path() -> PathBuf {
    PathBuf::from("./data.csv")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: HttpServerConfig::default(),
            db_path: default_db_path(),
            csv_path: default_csv_path(),
            on_corrupt: CorruptPolicy::default(),
        }
    }
}

impl Config {
    /// Load configuration from file. A missing file means all defaults.
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(CliError::config_error(format!(
                    "Failed to read config {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Apply command line overrides, then re-validate
    pub fn with_overrides(mut self, overrides: &Overrides) -> CliResult<Self> {
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(db) = &overrides.db {
            self.db_path = db.clone();
        }
        if let Some(csv) = &overrides.csv {
            self.csv_path = csv.clone();
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> CliResult<()> {
        if self.server.port == 0 {
            return Err(CliError::config_error("port must be > 0"));
        }
        if self.server.host.trim().is_empty() {
            return Err(CliError::config_error("host must not be empty"));
        }
        if self.db_path.as_os_str().is_empty() {
            return Err(CliError::config_error("db_path must not be empty"));
        }
        if self.csv_path.as_os_str().is_empty() {
            return Err(CliError::config_error("csv_path must not be empty"));
        }
        Ok(())
    }

    /// Write this config as pretty JSON
    pub fn write(&self, path: &Path) -> CliResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::errors::CliErrorCode;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&dir.path().join("taskd.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("taskd.json");
        fs::write(&path, r#"{"port": 4000, "db_path": "/data/tasks.json", "on_corrupt": "reset"}"#)
            .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.db_path, PathBuf::from("/data/tasks.json"));
        assert_eq!(config.csv_path, PathBuf::from("./data.csv"));
        assert_eq!(config.on_corrupt, CorruptPolicy::Reset);
    }

    #[test]
    fn test_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("taskd.json");
        fs::write(&path, "{port: }").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_zero_port_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("taskd.json");
        fs::write(&path, r#"{"port": 0}"#).unwrap();

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_unknown_corrupt_policy_rejected() {
        let result: Result<Config, _> = serde_json::from_str(r#"{"on_corrupt": "ignore"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_win() {
        let overrides = Overrides {
            port: Some(9000),
            db: Some(PathBuf::from("other.json")),
            csv: None,
        };

        let config = Config::default().with_overrides(&overrides).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.db_path, PathBuf::from("other.json"));
        assert_eq!(config.csv_path, PathBuf::from("./data.csv"));
    }

    #[test]
    fn test_write_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("taskd.json");

        Config::default().write(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }
}
