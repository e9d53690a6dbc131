//! This module defines all the errors that can occur while executing luadump-cli.

use thiserror::Error;

/// Error that occur during execution of the CLI app
#[derive(Error, Debug)]
pub enum CliError {
    /// Error while connecting to the database
    #[error("unable to connect to {host}:{port}: {source}")]
    Connection {
        /// Host that was contacted
        host: String,
        /// Port that was contacted
        port: u16,
        /// Underlying error
        source: luadump::error::SourceError,
    },
    /// Error originating from luadump
    #[error(transparent)]
    ExportError(#[from] luadump::error::Error),
}
