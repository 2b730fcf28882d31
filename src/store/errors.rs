//! # Store Errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Table store errors
///
/// A missing record is not an error; lookups return `None` for that.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read store file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write store file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backing file exists but is not a valid table store
    #[error("store file {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("failed to serialize store: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    /// Corruption stops the process; everything else fails one operation
    pub fn is_fatal(&self) -> bool {
        matches!(self, StoreError::Corrupt { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_corruption_is_fatal() {
        let corrupt = StoreError::Corrupt {
            path: PathBuf::from("db.json"),
            reason: "expected value".to_string(),
        };
        assert!(corrupt.is_fatal());
        assert!(corrupt.to_string().contains("db.json"));

        let write = StoreError::Write {
            path: PathBuf::from("db.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!write.is_fatal());
    }
}
