#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Report output for fitted trolley rate models.
//!
//! Three sinks: fixed-width coefficient tables for the terminal
//! ([`model_summary`], [`forecast_table`]), a serializable
//! [`RegionReport`] for JSON emission, and standalone SVG plots of the
//! weekly series with the fitted curve overlaid ([`write_series_plot`]).
//! All are plain value builders; the only fallible step is writing a
//! plot file to disk.

pub mod report;
pub mod summary;
pub mod svg;

use std::path::PathBuf;

use thiserror::Error;

pub use report::RegionReport;
pub use summary::{forecast_table, model_summary};
pub use svg::{series_plot, write_series_plot};

/// Errors from writing report artifacts.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Failed to write a plot file.
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        /// Path that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
