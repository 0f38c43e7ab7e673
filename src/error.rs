use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for loading a single table.
pub type LoadResult<T> = Result<T, LoadError>;

/// Error type returned when a single file cannot be loaded.
///
/// These errors are recovered at file granularity: the file is skipped and the run continues.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file extension is not one of the supported tabular formats.
    #[error("unsupported file format '{extension}' ({})", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read error (bad encoding, ragged rows, ...).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Parquet read error.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[cfg(feature = "excel")]
    /// Excel read error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// Feather (Arrow IPC) read error.
    #[error("feather error: {0}")]
    Feather(#[from] polars::error::PolarsError),

    /// The file was readable but its content cannot be interpreted as a table.
    #[error("malformed table: {message}")]
    Malformed { message: String },
}

/// Fatal errors that abort a whole inspection run.
#[derive(Debug, Error)]
pub enum InspectError {
    /// The data directory does not exist (checked before any processing).
    #[error("data directory '{}' does not exist", path.display())]
    MissingDataDirectory { path: PathBuf },

    /// Discovery found no file with a supported extension.
    #[error("no supported tabular files found in '{}'", path.display())]
    NoFilesFound { path: PathBuf },

    /// Every discovered file failed to load.
    #[error("could not summarize any of the {attempted} discovered file(s)")]
    NoSummariesProduced { attempted: usize },

    /// Writing a report file failed.
    #[error("failed to write '{}': {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization of the report failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
