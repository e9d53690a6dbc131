//! Functionality to read and write data is implemented here.
//!
//! Data sources deliver schemas and rows, the formats turn them into text and the
//! [OutputManager] takes care of the file the text ends up in.

pub mod formats;
pub mod output_manager;
pub mod source;

pub use output_manager::OutputManager;
pub use source::DataSource;
