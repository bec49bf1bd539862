#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Core trolley count and rate series types.
//!
//! These types carry the data between pipeline stages: daily per-region
//! counts out of ingestion, population denominators, and the weekly
//! per-10,000 rate series that the model fitter consumes.

use std::collections::BTreeMap;

use chrono::{Datelike as _, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use trolley_watch_region_models::HealthRegion;

/// Rates are expressed per this many residents.
pub const RATE_SCALE: f64 = 10_000.0;

/// One day's aggregated trolley count for a health region.
///
/// Produced by ingestion after hospital rows have been attributed to
/// regions and summed. The count is the number of admitted patients
/// waiting on trolleys across the region's EDs on that date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrolleyReport {
    /// Report date.
    pub date: NaiveDate,
    /// Region the count is attributed to.
    pub region: HealthRegion,
    /// Total trolleys across the region's EDs. Never negative.
    pub count: u32,
}

/// Population figures keyed by (region, year).
///
/// The denominator for rate normalization. Loaded once per run from a
/// CSO-style estimates file; figures are always positive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulationTable {
    entries: BTreeMap<(HealthRegion, i32), u32>,
}

impl PopulationTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Inserts a population figure, returning the previous value if the
    /// (region, year) pair was already present.
    pub fn insert(&mut self, region: HealthRegion, year: i32, population: u32) -> Option<u32> {
        self.entries.insert((region, year), population)
    }

    /// Looks up the population figure for a region in a given year.
    #[must_use]
    pub fn get(&self, region: HealthRegion, year: i32) -> Option<u32> {
        self.entries.get(&(region, year)).copied()
    }

    /// Returns the number of (region, year) entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Returns the Monday of the ISO week containing `date`.
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.week(Weekday::Mon).first_day()
}

/// Returns the ISO year that owns the week starting on `monday`.
///
/// Differs from the calendar year for weeks straddling New Year: the
/// week starting Mon 2024-12-30 belongs to ISO year 2025.
#[must_use]
pub fn iso_year(monday: NaiveDate) -> i32 {
    monday.iso_week().year()
}

/// A single week's observation in a rate series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPoint {
    /// Monday of the ISO week.
    pub week_start: NaiveDate,
    /// Trolleys per 10,000 population. `None` marks a week with no
    /// report rows at all: an ingestion gap, not a zero-trolley week.
    pub rate: Option<f64>,
}

/// An ordered, contiguous weekly rate series for one region.
///
/// Spans every ISO week from the first to the last observed week;
/// weeks without data are present as explicit gaps rather than being
/// dropped. The first and last points are always observed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyRateSeries {
    region: HealthRegion,
    points: Vec<WeeklyPoint>,
}

impl WeeklyRateSeries {
    /// Builds a series from pre-ordered points.
    ///
    /// Callers (the series builder and the gap helpers) are responsible
    /// for handing in consecutive Mondays; this is checked in debug
    /// builds only.
    #[must_use]
    pub fn new(region: HealthRegion, points: Vec<WeeklyPoint>) -> Self {
        debug_assert!(
            points
                .windows(2)
                .all(|w| w[1].week_start == w[0].week_start + Days::new(7)),
            "weekly points must be consecutive Mondays"
        );
        Self { region, points }
    }

    /// The region this series describes.
    #[must_use]
    pub const fn region(&self) -> HealthRegion {
        self.region
    }

    /// All weekly points, gaps included.
    #[must_use]
    pub fn points(&self) -> &[WeeklyPoint] {
        &self.points
    }

    /// Total number of weeks spanned, gaps included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the series spans no weeks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of weeks with an observed rate.
    #[must_use]
    pub fn observed_len(&self) -> usize {
        self.points.iter().filter(|p| p.rate.is_some()).count()
    }

    /// Number of gap weeks.
    #[must_use]
    pub fn gap_count(&self) -> usize {
        self.points.iter().filter(|p| p.rate.is_none()).count()
    }

    /// Monday of the first spanned week.
    #[must_use]
    pub fn first_week(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.week_start)
    }

    /// Monday of the last spanned week.
    #[must_use]
    pub fn last_week(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.week_start)
    }

    /// Returns every rate as a dense vector, or `None` if any week is
    /// still a gap. The fitter requires a dense window.
    #[must_use]
    pub fn dense_values(&self) -> Option<Vec<f64>> {
        self.points.iter().map(|p| p.rate).collect()
    }
}
