//! Data sources deliver table schemas, rows, and the side lookup used for enrichment.

pub mod memory;
#[cfg(feature = "mysql")]
pub mod mysql;

use thiserror::Error;

use crate::{
    datavalues::Row,
    export::{LookupSpec, SideLookup},
    schema::TableSchema,
};

pub use memory::MemorySource;
#[cfg(feature = "mysql")]
pub use mysql::{ConnectionSettings, MySqlSource};

/// Errors that can occur while reading from a [DataSource].
#[allow(variant_size_differences)]
#[derive(Error, Debug)]
pub enum SourceError {
    /// Connecting to the database failed
    #[cfg(feature = "mysql")]
    #[error("unable to connect to the database: {0}")]
    Connection(#[source] sqlx::Error),
    /// A query failed
    #[cfg(feature = "mysql")]
    #[error("query on table \"{table}\" failed: {error}")]
    Query {
        /// Table the query was about
        table: String,
        /// Error reported by the driver
        #[source]
        error: sqlx::Error,
    },
    /// The runtime driving the database connection could not be created
    #[error("unable to start the database runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// The table does not exist
    #[error("table \"{0}\" does not exist or has no columns")]
    UnknownTable(String),
    /// The column does not exist
    #[error("table \"{table}\" has no column \"{column}\"")]
    UnknownColumn {
        /// Table that was queried
        table: String,
        /// Name of the missing column
        column: String,
    },
    /// The column has a type that cannot be exported
    #[error("column \"{column}\" of table \"{table}\" has unsupported type {type_name}")]
    UnsupportedType {
        /// Table that was queried
        table: String,
        /// Column with the unsupported type
        column: String,
        /// Name of the type
        type_name: String,
    },
    /// A cell could not be decoded
    #[error("unable to decode column \"{column}\" of table \"{table}\": {message}")]
    Decode {
        /// Table that was queried
        table: String,
        /// Column of the cell
        column: String,
        /// Description of the problem
        message: String,
    },
    /// A table or column name that cannot safely be used in a query
    #[error("\"{0}\" is not a valid table or column name")]
    InvalidIdentifier(String),
}

/// Capability to read the tables of an export.
pub trait DataSource {
    /// Return the columns of `table` in physical order.
    fn resolve_schema(&mut self, table: &str) -> Result<TableSchema, SourceError>;

    /// Return all rows of the table described by `schema`, in source order.
    fn fetch_rows(&mut self, schema: &TableSchema) -> Result<Vec<Row>, SourceError>;

    /// Build the [SideLookup] described by `spec`.
    fn fetch_side_lookup(&mut self, spec: &LookupSpec) -> Result<SideLookup, SourceError>;
}
