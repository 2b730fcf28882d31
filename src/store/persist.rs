//! On-disk mirror of the table store
//!
//! The whole collection is one JSON document. Writes go to a sibling temp
//! file which is fsynced and then renamed over the backing file, so a crash
//! mid-write leaves the previous document intact.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;

use super::errors::{StoreError, StoreResult};

/// Table name -> rows, in insertion order
pub type Tables<R> = BTreeMap<String, Vec<R>>;

/// What to do when the backing file exists but cannot be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorruptPolicy {
    /// Refuse to start
    #[default]
    Fail,
    /// Move the file aside and start empty
    Reset,
}

/// Result of reading the backing file at startup
#[derive(Debug)]
pub enum Loaded<R> {
    /// File parsed into tables
    Existing(Tables<R>),
    /// File absent or blank
    Missing,
    /// File present but unparseable
    Corrupt(String),
}

/// Read and parse the backing file
pub async fn load_tables<R: DeserializeOwned>(path: &Path) -> StoreResult<Loaded<R>> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Loaded::Missing),
        Err(e) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    if content.trim().is_empty() {
        return Ok(Loaded::Missing);
    }

    match serde_json::from_str::<Tables<R>>(&content) {
        Ok(tables) => Ok(Loaded::Existing(tables)),
        Err(e) => Ok(Loaded::Corrupt(e.to_string())),
    }
}

/// Serialize every table and atomically replace the backing file.
///
/// Returns the number of bytes written.
pub async fn write_tables<R: Serialize>(path: &Path, tables: &Tables<R>) -> StoreResult<usize> {
    let content = serde_json::to_vec(tables)?;
    let temp_path = temp_path_for(path);
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .await
        .map_err(write_err)?;

    file.write_all(&content).await.map_err(write_err)?;
    file.sync_all().await.map_err(write_err)?;
    drop(file);

    fs::rename(&temp_path, path).await.map_err(write_err)?;

    // Make the rename itself durable
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Ok(dir) = File::open(parent).await {
            let _ = dir.sync_all().await;
        }
    }

    Ok(content.len())
}

/// Move a corrupt backing file out of the way. Returns where it went.
pub async fn quarantine(path: &Path) -> StoreResult<PathBuf> {
    let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
    let target = append_extension(path, &format!("corrupt-{}", stamp));

    fs::rename(path, &target)
        .await
        .map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(target)
}

fn temp_path_for(path: &Path) -> PathBuf {
    append_extension(path, "tmp")
}

fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}
