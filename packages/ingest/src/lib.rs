#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! CSV ingestion for the trolley-watch pipeline.
//!
//! Two loaders, one per input file: [`reports::load_reports`] turns the
//! daily per-hospital TrolleyGAR export into per-region daily totals,
//! and [`population::load_population`] reads CSO regional population
//! estimates. Malformed rows are skipped with a warning rather than
//! failing the whole file; structural problems (missing columns, no
//! usable rows) are hard errors.

pub mod parsing;
pub mod population;
pub mod reports;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use population::load_population;
pub use reports::load_reports;

use crate::parsing::find_column;

/// Errors from loading an input CSV file.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The file could not be opened or read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The CSV structure itself was unreadable.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// A required column is absent from the header row.
    #[error("{}: missing required column '{column}'", path.display())]
    MissingColumn {
        /// Path of the offending file.
        path: PathBuf,
        /// The column that was expected.
        column: String,
    },
    /// The file parsed but produced no usable rows.
    #[error("{}: no usable rows", path.display())]
    Empty {
        /// Path of the offending file.
        path: PathBuf,
    },
}

/// Looks up a required column, converting absence into
/// [`IngestError::MissingColumn`].
pub(crate) fn require_column(
    headers: &[String],
    name: &str,
    path: &Path,
) -> Result<usize, IngestError> {
    find_column(headers, name).ok_or_else(|| IngestError::MissingColumn {
        path: path.to_path_buf(),
        column: name.to_string(),
    })
}
