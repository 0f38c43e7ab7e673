//! Table loading entrypoints and implementations.
//!
//! Most callers should use [`load_table`] (from [`unified`]) which:
//!
//! - auto-detects the format by file extension (or you can override via [`LoadOptions`])
//! - loads the file into an in-memory [`crate::types::DataSet`] with inferred column types
//! - optionally reports success/failure to a [`LoadObserver`]
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`parquet`]
//! - [`feather`]
//! - `excel` (feature `excel`)

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod feather;
pub mod observability;
pub mod parquet;
pub mod unified;

pub use observability::{LoadContext, LoadObserver, LoadSeverity, LoadStats, TracingObserver};
pub use unified::{ExcelSheetSelection, LoadOptions, SUPPORTED_EXTENSIONS, TableFormat, load_table};
