//! # CSV Import
//!
//! Reads task rows from a CSV file for bulk import. The reader is lazy and
//! each call to `CsvSource::rows` starts from the top of the file again.

pub mod errors;
pub mod reader;
pub mod row;

pub use errors::{CsvError, CsvResult};
pub use reader::{CsvRows, CsvSource};
pub use row::{ColumnMap, ImportRow};
