//! Row sources
//!
//! The pipeline consumes any iterator of `Result<SourceRow, RowSourceError>`;
//! a source error is reported against its row position like any other
//! per-row failure.

mod csv_source;

pub use csv_source::CsvRowSource;

use crate::records::RawRow;
use std::path::PathBuf;
use thiserror::Error;

/// One row plus its (not yet parsed) category tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    pub category: String,
    pub row: RawRow,
}

impl SourceRow {
    pub fn new(category: impl Into<String>, row: RawRow) -> Self {
        Self {
            category: category.into(),
            row,
        }
    }
}

#[derive(Debug, Error)]
pub enum RowSourceError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Neither an explicit category, a `category` column nor a usable file name
    #[error("Cannot determine category for {0}")]
    UnknownCategory(PathBuf),
}
