#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Weekly rate series construction.
//!
//! Turns per-region daily totals into a contiguous ISO-week series of
//! trolleys per 10,000 population. Weeks without any report rows become
//! explicit gaps (never zeroes); [`gaps::GapPolicy`] decides what
//! happens to them before modelling.

pub mod gaps;

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use thiserror::Error;
use trolley_watch_region_models::HealthRegion;
use trolley_watch_trolley_models::{
    PopulationTable, RATE_SCALE, TrolleyReport, WeeklyPoint, WeeklyRateSeries, iso_year,
    week_start,
};

pub use gaps::GapPolicy;

/// Errors from building or repairing a weekly rate series.
#[derive(Debug, Error)]
pub enum SeriesError {
    /// The report set holds no rows for the requested region.
    #[error("No reports for {}", region.official_name())]
    EmptyRegion {
        /// The region that had no data.
        region: HealthRegion,
    },
    /// An observed week falls in a year with no population figure, so
    /// its rate cannot be scaled.
    #[error("No population figure for {} in {year}", region.official_name())]
    MissingPopulation {
        /// The region missing a figure.
        region: HealthRegion,
        /// ISO year of the affected week.
        year: i32,
    },
    /// The series still has gaps and the policy forbids them.
    #[error("{} series has {missing} missing week(s)", region.official_name())]
    GapsPresent {
        /// The region whose series is gappy.
        region: HealthRegion,
        /// Number of missing weeks.
        missing: usize,
    },
}

/// Builds the contiguous weekly rate series for one region.
///
/// Daily counts are summed per ISO week (keyed by Monday) and scaled to
/// trolleys per 10,000 population, using the population figure for the
/// week's ISO year. The series spans every week from the first observed
/// to the last observed; weeks with no reports at all are explicit gaps.
/// Rates are never negative.
///
/// # Errors
///
/// Returns [`SeriesError::EmptyRegion`] if `reports` holds no rows for
/// `region`, and [`SeriesError::MissingPopulation`] if any observed
/// week's ISO year has no population figure. Gap weeks do not require
/// population data.
pub fn build_weekly_series(
    reports: &[TrolleyReport],
    population: &PopulationTable,
    region: HealthRegion,
) -> Result<WeeklyRateSeries, SeriesError> {
    let mut weekly_counts: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for report in reports.iter().filter(|r| r.region == region) {
        let total = weekly_counts.entry(week_start(report.date)).or_insert(0);
        *total = total.saturating_add(report.count);
    }

    let (Some(first), Some(last)) = (
        weekly_counts.keys().next().copied(),
        weekly_counts.keys().next_back().copied(),
    ) else {
        return Err(SeriesError::EmptyRegion { region });
    };

    let mut points = Vec::new();
    let mut monday = first;
    while monday <= last {
        let rate = match weekly_counts.get(&monday) {
            Some(count) => {
                let year = iso_year(monday);
                let figure = population.get(region, year).ok_or(
                    SeriesError::MissingPopulation { region, year },
                )?;
                Some(f64::from(*count) * RATE_SCALE / f64::from(figure))
            }
            None => None,
        };
        points.push(WeeklyPoint {
            week_start: monday,
            rate,
        });
        monday = monday + Days::new(7);
    }

    let series = WeeklyRateSeries::new(region, points);
    log::debug!(
        "{}: {} week series ({} observed, {} gaps)",
        region,
        series.len(),
        series.observed_len(),
        series.gap_count()
    );
    Ok(series)
}
