//! Fixed-width terminal tables for fitted models.

use std::fmt::Write;

use trolley_watch_fit::{Coefficient, FittedModel, ForecastPoint};

/// Renders the coefficient table and fit diagnostics for one region.
///
/// The caller decides where the text goes; this function only formats.
#[must_use]
pub fn model_summary(model: &FittedModel) -> String {
    let mut output = String::new();

    writeln!(
        output,
        "{} ({} weeks, {} to {})",
        model.region().official_name(),
        model.observations(),
        model.first_week(),
        model.last_week()
    )
    .unwrap();
    writeln!(output, "{}", "-".repeat(52)).unwrap();

    writeln!(output, "{:<26} {:>12} {:>12}", "TERM", "ESTIMATE", "STD ERR").unwrap();
    coefficient_row(&mut output, "intercept (c)", model.intercept());
    coefficient_row(&mut output, "previous week (phi)", model.ar());
    coefficient_row(&mut output, "annual sin (a)", model.sin_coef());
    coefficient_row(&mut output, "annual cos (b)", model.cos_coef());
    writeln!(output, "{:<26} {:>12.4}", "amplitude (A)", model.amplitude()).unwrap();
    writeln!(output, "{:<26} {:>12.4}", "phase (theta, rad)", model.phase()).unwrap();
    writeln!(output).unwrap();

    writeln!(output, "{:<26} {:>12.4}", "R squared", model.r_squared()).unwrap();
    writeln!(
        output,
        "{:<26} {:>12.4}",
        "residual variance",
        model.residual_variance()
    )
    .unwrap();
    writeln!(
        output,
        "{:<26} {:>12.4}",
        "residual lag-1 autocorr",
        model.lag1_autocorrelation()
    )
    .unwrap();
    writeln!(output, "{:<26} {:>12.2}", "AIC", model.aic()).unwrap();
    writeln!(output, "{:<26} {:>12.2}", "BIC", model.bic()).unwrap();

    output
}

/// Renders projected weeks as a two-column table.
#[must_use]
pub fn forecast_table(points: &[ForecastPoint]) -> String {
    let mut output = String::new();

    writeln!(output, "{:<12} {:>14}", "WEEK", "FORECAST RATE").unwrap();
    for point in points {
        writeln!(output, "{:<12} {:>14.2}", point.week_start, point.rate).unwrap();
    }

    output
}

fn coefficient_row(output: &mut String, label: &str, coefficient: Coefficient) {
    writeln!(
        output,
        "{:<26} {:>12.4} {:>12.4}",
        label, coefficient.value, coefficient.std_error
    )
    .unwrap();
}

#[cfg(test)]
mod tests {
    use chrono::{Days, NaiveDate};
    use trolley_watch_fit::fit_model;
    use trolley_watch_region_models::HealthRegion;
    use trolley_watch_trolley_models::{WeeklyPoint, WeeklyRateSeries};

    use super::*;

    fn fitted_model() -> FittedModel {
        let start = NaiveDate::from_ymd_opt(2019, 1, 7).unwrap();
        let mut values = vec![20.0_f64];
        for t in 1..156 {
            let seasonal =
                2.0 * (std::f64::consts::TAU * f64::from(u16::try_from(t).unwrap()) / 52.0).sin();
            values.push(3.0 + 0.5 * values[t - 1] + seasonal);
        }
        let points = values
            .iter()
            .enumerate()
            .map(|(i, rate)| WeeklyPoint {
                week_start: start + Days::new(7 * u64::try_from(i).unwrap()),
                rate: Some(*rate),
            })
            .collect();
        fit_model(&WeeklyRateSeries::new(HealthRegion::MidWest, points)).unwrap()
    }

    #[test]
    fn summary_names_the_region_and_window() {
        let summary = model_summary(&fitted_model());
        assert!(summary.starts_with("HSE Mid West (156 weeks, 2019-01-07 to 2021-12-27)"));
    }

    #[test]
    fn summary_lists_every_term_and_diagnostic() {
        let summary = model_summary(&fitted_model());
        for label in [
            "intercept (c)",
            "previous week (phi)",
            "annual sin (a)",
            "annual cos (b)",
            "amplitude (A)",
            "phase (theta, rad)",
            "R squared",
            "residual variance",
            "residual lag-1 autocorr",
            "AIC",
            "BIC",
        ] {
            assert!(summary.contains(label), "missing row: {label}");
        }
    }

    #[test]
    fn summary_shows_recovered_coefficients() {
        // The generator is exact, so the estimates print exactly.
        let summary = model_summary(&fitted_model());
        assert!(summary.contains("0.5000"));
        assert!(summary.contains("2.0000"));
    }

    #[test]
    fn forecast_table_lists_each_week() {
        let model = fitted_model();
        let forecast = model.forecast(3);
        let table = forecast_table(&forecast);

        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("FORECAST RATE"));
        assert!(lines[1].starts_with("2022-01-03"));
    }
}
