//! Error-handling module for the crate

use std::path::PathBuf;

use thiserror::Error;

pub use crate::io::source::SourceError;

/// Error-Collection for all the possible Errors occurring in this crate
#[allow(variant_size_differences)]
#[derive(Error, Debug)]
pub enum Error {
    /// Error reported by the data source
    #[error(transparent)]
    Source(#[from] SourceError),
    /// A row of the designated table has no entry in the side lookup
    #[error("row key {key} of table \"{table}\" has no entry in the side lookup")]
    LookupMiss {
        /// Table that is being exported
        table: String,
        /// Key taken from the first column of the row
        key: i64,
    },
    /// The first cell of a row in the designated table cannot be used as lookup key
    #[error("row of table \"{table}\" has no integer key in its first column (found {value})")]
    InvalidLookupKey {
        /// Table that is being exported
        table: String,
        /// Textual form of the offending cell
        value: String,
    },
    /// A row does not have one cell per column
    #[error("row of table \"{table}\" has {found} cells, but the table has {expected} columns")]
    ArityMismatch {
        /// Table that is being exported
        table: String,
        /// Number of columns in the schema
        expected: usize,
        /// Number of cells in the row
        found: usize,
    },
    /// IO Error
    #[error(transparent)]
    IO(#[from] std::io::Error),
    /// File exists and should not be overwritten
    #[error("File \"{filename}\" exists and would be overwritten!\nConsider using the `--overwrite` option, choosing a different `--output` file, or deleting \"{filename}\".")]
    IOExists {
        /// Filename which caused the error
        filename: PathBuf,
    },
    /// Error during a Write operation
    #[error("Failed to write \"{filename}\": {error}")]
    IOWriting {
        /// Underlying IO error
        error: std::io::Error,
        /// Name of the file that could not be written
        filename: PathBuf,
    },
}
