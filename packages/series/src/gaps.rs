//! Gap policies for weekly rate series.
//!
//! The model fitter needs a dense window, so gappy series must be
//! repaired (or rejected) first. Three policies: refuse to continue,
//! linearly interpolate interior gaps, or truncate to the longest
//! contiguous observed run.

use strum_macros::{Display, EnumString};
use trolley_watch_trolley_models::{WeeklyPoint, WeeklyRateSeries};

use crate::SeriesError;

/// What to do with missing weeks before fitting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum GapPolicy {
    /// Refuse to fit a series with any missing week.
    #[default]
    Fail,
    /// Linearly interpolate each interior run of missing weeks from the
    /// observed values on either side.
    Interpolate,
    /// Keep only the longest contiguous run of observed weeks; ties
    /// prefer the most recent run.
    Truncate,
}

impl GapPolicy {
    /// Applies this policy, returning a gap-free series.
    ///
    /// A series with no gaps passes through unchanged under every
    /// policy.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::GapsPresent`] under [`GapPolicy::Fail`]
    /// when the series has missing weeks.
    pub fn apply(self, series: WeeklyRateSeries) -> Result<WeeklyRateSeries, SeriesError> {
        let missing = series.gap_count();
        if missing == 0 {
            return Ok(series);
        }
        match self {
            Self::Fail => Err(SeriesError::GapsPresent {
                region: series.region(),
                missing,
            }),
            Self::Interpolate => {
                log::info!(
                    "{}: interpolating {missing} missing week(s)",
                    series.region()
                );
                Ok(interpolate_gaps(&series))
            }
            Self::Truncate => {
                let truncated = truncate_to_longest_run(&series);
                log::info!(
                    "{}: truncated {} week series to longest run of {}",
                    series.region(),
                    series.len(),
                    truncated.len()
                );
                Ok(truncated)
            }
        }
    }
}

/// Fills interior gap runs by linear interpolation between the observed
/// values on either side.
///
/// Leading or trailing gaps have only one neighbour and are left in
/// place; series built by [`crate::build_weekly_series`] never have
/// them.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn interpolate_gaps(series: &WeeklyRateSeries) -> WeeklyRateSeries {
    let points = series.points();
    let mut filled: Vec<WeeklyPoint> = points.to_vec();

    let mut last_observed: Option<(usize, f64)> = None;
    for (i, point) in points.iter().enumerate() {
        let Some(right) = point.rate else {
            continue;
        };
        if let Some((left_idx, left)) = last_observed
            && i > left_idx + 1
        {
            // left_idx and i bracket a run of gaps.
            let span = (i - left_idx) as f64;
            for (offset, gap) in filled[left_idx + 1..i].iter_mut().enumerate() {
                let fraction = (offset + 1) as f64 / span;
                gap.rate = Some(left + (right - left) * fraction);
            }
        }
        last_observed = Some((i, right));
    }

    WeeklyRateSeries::new(series.region(), filled)
}

/// Cuts the series down to its longest contiguous run of observed
/// weeks. Ties prefer the most recent run.
#[must_use]
pub fn truncate_to_longest_run(series: &WeeklyRateSeries) -> WeeklyRateSeries {
    let points = series.points();

    let mut best: (usize, usize) = (0, 0);
    let mut run_start = 0;
    let mut run_len = 0;
    for (i, point) in points.iter().enumerate() {
        if point.rate.is_some() {
            if run_len == 0 {
                run_start = i;
            }
            run_len += 1;
            if run_len >= best.1 {
                best = (run_start, run_len);
            }
        } else {
            run_len = 0;
        }
    }

    let (start, len) = best;
    WeeklyRateSeries::new(series.region(), points[start..start + len].to_vec())
}

#[cfg(test)]
mod tests {
    use chrono::{Days, NaiveDate};
    use trolley_watch_region_models::HealthRegion;

    use super::*;

    fn series_of(rates: &[Option<f64>]) -> WeeklyRateSeries {
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points = rates
            .iter()
            .enumerate()
            .map(|(i, rate)| WeeklyPoint {
                week_start: monday + Days::new(7 * u64::try_from(i).unwrap()),
                rate: *rate,
            })
            .collect();
        WeeklyRateSeries::new(HealthRegion::MidWest, points)
    }

    fn rates(series: &WeeklyRateSeries) -> Vec<Option<f64>> {
        series.points().iter().map(|p| p.rate).collect()
    }

    #[test]
    fn interpolates_single_gap() {
        let series = series_of(&[Some(1.0), None, Some(3.0)]);
        let filled = interpolate_gaps(&series);
        assert_eq!(rates(&filled), vec![Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn interpolates_gap_runs() {
        let series = series_of(&[Some(1.0), None, None, Some(4.0)]);
        let filled = interpolate_gaps(&series);
        assert_eq!(
            rates(&filled),
            vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)]
        );
    }

    #[test]
    fn interpolation_preserves_observed_values() {
        let series = series_of(&[Some(5.0), None, Some(2.0), None, Some(8.0)]);
        let filled = interpolate_gaps(&series);
        let filled_rates = rates(&filled);
        assert_eq!(filled_rates[0], Some(5.0));
        assert_eq!(filled_rates[2], Some(2.0));
        assert_eq!(filled_rates[4], Some(8.0));
        assert_eq!(filled_rates[1], Some(3.5));
        assert_eq!(filled_rates[3], Some(5.0));
    }

    #[test]
    fn interpolation_leaves_edge_gaps_in_place() {
        let series = series_of(&[None, Some(2.0), None, Some(4.0), None, None]);
        let filled = interpolate_gaps(&series);
        assert_eq!(
            rates(&filled),
            vec![None, Some(2.0), Some(3.0), Some(4.0), None, None]
        );
    }

    #[test]
    fn truncate_keeps_longest_run() {
        let series = series_of(&[
            Some(1.0),
            Some(2.0),
            Some(3.0),
            None,
            Some(4.0),
            Some(5.0),
        ]);
        let truncated = truncate_to_longest_run(&series);
        assert_eq!(rates(&truncated), vec![Some(1.0), Some(2.0), Some(3.0)]);
        assert_eq!(
            truncated.first_week(),
            Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        );
    }

    #[test]
    fn truncate_prefers_recent_run_on_tie() {
        let series = series_of(&[Some(1.0), Some(2.0), None, Some(3.0), Some(4.0)]);
        let truncated = truncate_to_longest_run(&series);
        assert_eq!(rates(&truncated), vec![Some(3.0), Some(4.0)]);
    }

    #[test]
    fn fail_policy_rejects_gappy_series() {
        let series = series_of(&[Some(1.0), None, Some(3.0)]);
        let err = GapPolicy::Fail.apply(series).unwrap_err();
        assert!(matches!(err, SeriesError::GapsPresent { missing: 1, .. }));
    }

    #[test]
    fn every_policy_passes_dense_series_through() {
        for policy in [GapPolicy::Fail, GapPolicy::Interpolate, GapPolicy::Truncate] {
            let series = series_of(&[Some(1.0), Some(2.0), Some(3.0)]);
            let out = policy.apply(series.clone()).unwrap();
            assert_eq!(out, series);
        }
    }

    #[test]
    fn policy_parses_from_cli_names() {
        assert_eq!("fail".parse::<GapPolicy>().unwrap(), GapPolicy::Fail);
        assert_eq!(
            "interpolate".parse::<GapPolicy>().unwrap(),
            GapPolicy::Interpolate
        );
        assert_eq!(
            "truncate".parse::<GapPolicy>().unwrap(),
            GapPolicy::Truncate
        );
        assert!("drop".parse::<GapPolicy>().is_err());
    }
}
