use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

use crate::models::bar_table::BarTable;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SinkError {
    /// An error occurred while trying to write the data (e.g., file I/O error).
    #[snafu(display("Failed to write data: {message}"))]
    WriteError {
        message: String,
        backtrace: Backtrace,
    },

    /// A `BarTable` could not be converted into the destination format.
    #[snafu(display("Data conversion error: {message}"))]
    ConversionError {
        message: String,
        backtrace: Backtrace,
    },

    /// A generic I/O error.
    #[snafu(display("I/O error: {source}"))]
    Io {
        source: std::io::Error,
        backtrace: Backtrace,
    },
}

#[async_trait]
pub trait DataSink {
    /// The type of output returned after a successful write operation.
    ///
    /// A file sink returns the paths it created; a database sink might
    /// return the number of rows inserted.
    type Output;

    /// Writes a slice of `BarTable`s to the destination.
    async fn write(&self, data: &[BarTable]) -> Result<Self::Output, SinkError>;
}
