//! # CSV Import Errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type CsvResult<T> = Result<T, CsvError>;

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed CSV near line {line}: {source}")]
    Parse {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("line {line} has no '{column}' column")]
    MissingColumn { line: u64, column: &'static str },
}

impl CsvError {
    pub(crate) fn parse(source: csv::Error) -> Self {
        let line = source.position().map_or(0, |p| p.line());
        CsvError::Parse { line, source }
    }
}
