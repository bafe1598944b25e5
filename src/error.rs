use std::io;
use std::path::PathBuf;

use serde_json::Error as SerdeError;
use thiserror::Error;

/// Errors produced while loading, screening or reporting trips
#[derive(Debug, Error)]
pub enum Error {
    /// A file couldn't be opened, read or written
    #[error("Failed to access file {path:?}: {inner}")]
    AccessError {
        /// The file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        inner: io::Error,
    },
    /// The trip data couldn't be read as CSV
    #[cfg(feature = "csv_input")]
    #[error("Failed to read trip data from {path:?}: {inner}")]
    CsvError {
        /// The file
        path: PathBuf,
        /// The underlying CSV error
        #[source]
        inner: csv::Error,
    },
    /// A report couldn't be serialized
    #[error("Failed to serialize report: {0}")]
    SerdeError(#[from] SerdeError),
    /// Writing the report failed
    #[error("Failed to write report: {0}")]
    Io(#[from] io::Error),
    /// Moments (and thresholds) were requested for a sample with no data points
    #[error("Cannot compute statistics of an empty sample")]
    EmptySample,
    /// A sample contained a `NaN`
    #[error("Sample contains NaN values")]
    NotANumber,
    /// The sigma multiplier must be finite and non-negative
    #[error("Invalid outlier multiplier: {0}")]
    InvalidMultiplier(f64),
}

/// Result alias used throughout the crate
pub type Result<T> = ::std::result::Result<T, Error>;

/// Logs an error through the `log` facade, along with its chain of causes
pub fn log_error(e: &Error) {
    error!("error: {}", e);

    let mut source = std::error::Error::source(e);
    while let Some(cause) = source {
        debug!("caused by: {}", cause);
        source = cause.source();
    }
}
