//! Export relational tables as Lua table constructors

#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts
)]
#![warn(
    missing_docs,
    unused_import_braces,
    unused_qualifications,
    unused_extern_crates,
    variant_size_differences
)]

pub mod datavalues;
pub mod error;
pub mod export;
pub mod io;
pub mod schema;

pub use datavalues::{CellValue, Row};
pub use export::{Enrichment, ExportPlan, ExportSummary, Exporter, LookupSpec};
pub use schema::{ColumnClass, ColumnDescriptor, TableSchema};
