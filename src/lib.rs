//! `schema-inspector` scans a directory of tabular files and summarizes what is in them.
//!
//! For every CSV, Parquet, Feather (Arrow IPC) and Excel file found under a data directory, it
//! loads the table, infers a type for each column, profiles the values (coverage, distinct
//! counts, examples) and suggests a role for the column: identifier, target, datetime, numeric,
//! binary, categorical or unknown. Feature-like columns with enough coverage are then ranked
//! as modeling candidates.
//!
//! ## Supported formats
//!
//! - **CSV**: `.csv` (types inferred from the text)
//! - **Parquet**: `.parquet`
//! - **Feather / Arrow IPC**: `.feather`
//! - **Excel** (requires the Cargo feature `excel`, on by default): `.xlsx`, `.xls`
//!
//! ## Example
//!
//! ```no_run
//! use schema_inspector::render::render_markdown;
//! use schema_inspector::report::{InspectOptions, inspect_directory};
//!
//! # fn main() -> Result<(), schema_inspector::InspectError> {
//! let options = InspectOptions {
//!     target: Some("churned".to_string()),
//!     ..InspectOptions::default()
//! };
//! let report = inspect_directory(&options)?;
//! println!("{}", render_markdown(&report));
//! # Ok(())
//! # }
//! ```
//!
//! Single tables can be summarized without a directory scan:
//!
//! ```rust
//! use schema_inspector::inference::Role;
//! use schema_inspector::summary::summarize_dataset;
//! use schema_inspector::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("user_id", DataType::Int64),
//!     Field::new("score", DataType::Float64),
//! ]);
//! let ds = DataSet::new(
//!     schema,
//!     vec![
//!         vec![Value::Int64(1), Value::Float64(0.5)],
//!         vec![Value::Int64(2), Value::Null],
//!     ],
//! );
//! let summary = summarize_dataset("scores.csv", &ds, None);
//! assert_eq!(summary.columns[0].role, Role::Id);
//! assert_eq!(summary.columns[1].coverage_pct, 50.0);
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: format detection and per-format loaders
//! - [`types`]: schema and in-memory dataset types
//! - [`profile`]: per-column statistics
//! - [`inference`]: role and note inference
//! - [`summary`]: per-file summaries
//! - [`report`]: directory discovery, candidate ranking and the run driver
//! - [`render`]: Markdown and JSON output
//! - [`cli`] and [`logging`]: the command-line surface

pub mod cli;
pub mod error;
pub mod inference;
pub mod ingestion;
pub mod logging;
pub mod profile;
pub mod render;
pub mod report;
pub mod summary;
pub mod types;

pub use error::{InspectError, LoadError, LoadResult};
