//! Lazy CSV row reader
//!
//! Comma-delimited, first record is the header, blank lines are skipped.
//! Quoting follows RFC 4180 as implemented by the `csv` crate: a quoted field
//! can hold commas, newlines and `""`, and a quote inside an unquoted field
//! is kept as a literal character.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecordsIntoIter};

use super::errors::{CsvError, CsvResult};
use super::row::{ColumnMap, ImportRow};

/// A CSV file of tasks. Every call to [`rows`](CsvSource::rows) starts over
/// from the top of the file.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the file and read its header
    pub fn rows(&self) -> CsvResult<CsvRows<File>> {
        let file = File::open(&self.path).map_err(|source| CsvError::Open {
            path: self.path.clone(),
            source,
        })?;
        CsvRows::new(file)
    }

    /// Read every row eagerly
    pub fn read_all(&self) -> CsvResult<Vec<ImportRow>> {
        self.rows()?.collect()
    }
}

/// Iterator over the data rows of a CSV stream
pub struct CsvRows<R> {
    records: StringRecordsIntoIter<R>,
    columns: ColumnMap,
}

impl<R: Read> CsvRows<R> {
    pub fn new(input: R) -> CsvResult<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(input);

        let columns = ColumnMap::from_header(reader.headers().map_err(CsvError::parse)?);

        Ok(Self {
            records: reader.into_records(),
            columns,
        })
    }
}

impl<R: Read> Iterator for CsvRows<R> {
    type Item = CsvResult<ImportRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(e) => return Some(Err(CsvError::parse(e))),
            };

            // whitespace-only lines count as blank
            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }

            let line = record.position().map_or(0, |p| p.line());
            return Some(self.columns.row(line, &record));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn rows(input: &str) -> Vec<ImportRow> {
        CsvRows::new(Cursor::new(input.to_string()))
            .unwrap()
            .collect::<CsvResult<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_plain_and_quoted_fields() {
        let parsed = rows("title,description\n\"a,b\",c\n\"say \"\"hi\"\"\",x\n");

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].title, "a,b");
        assert_eq!(parsed[0].description, "c");
        assert_eq!(parsed[1].title, "say \"hi\"");
    }

    #[test]
    fn test_header_skipped_and_blank_lines_ignored() {
        let parsed = rows("title,description\n\nTask 01,Desc 01\n   \nTask 02,Desc 02\n");

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].title, "Task 01");
        assert_eq!(parsed[1].description, "Desc 02");
    }

    #[test]
    fn test_crlf_line_endings() {
        let parsed = rows("title,description\r\na,b\r\nc,d\r\n");

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].description, "b");
        assert_eq!(parsed[1].title, "c");
    }

    #[test]
    fn test_quoted_field_spanning_lines() {
        let parsed = rows("title,description\n\"multi\",\"line one\nline two\"\nnext,row\n");

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].description, "line one\nline two");
        assert_eq!(parsed[1].title, "next");
    }

    #[test]
    fn test_quote_inside_unquoted_field_is_literal() {
        let parsed = rows("title,description\n5\" screen,buy\nfix 2\" pipe,call\n");

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].title, "5\" screen");
        assert_eq!(parsed[0].description, "buy");
        assert_eq!(parsed[1].title, "fix 2\" pipe");
        assert_eq!(parsed[1].description, "call");
    }

    #[test]
    fn test_missing_description_column() {
        let result: CsvResult<Vec<_>> = CsvRows::new(Cursor::new("title,description\nonly\n"))
            .unwrap()
            .collect();
        assert!(matches!(
            result,
            Err(CsvError::MissingColumn { line: 2, column: "description" })
        ));
    }

    #[test]
    fn test_empty_file_has_no_rows() {
        assert!(rows("").is_empty());
        assert!(rows("title,description\n").is_empty());
    }

    #[test]
    fn test_source_restarts_each_call() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "title,description\na,b\nc,d\n").unwrap();
        let source = CsvSource::new(&path);

        let mut first = source.rows().unwrap();
        assert_eq!(first.next().unwrap().unwrap().title, "a");

        assert_eq!(source.read_all().unwrap().len(), 2);
        assert_eq!(source.read_all().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_file() {
        let result = CsvSource::new("/definitely/not/here.csv").read_all();
        assert!(matches!(result, Err(CsvError::Open { .. })));
    }
}
