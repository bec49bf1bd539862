//! JSON-ready view of a fitted model.

use chrono::NaiveDate;
use serde::Serialize;
use trolley_watch_fit::{Coefficient, FittedModel, ForecastPoint};
use trolley_watch_region_models::HealthRegion;

/// One region's coefficients, diagnostics, and optional forecast,
/// shaped for machine-readable output.
///
/// Downstream tooling keys on the camelCase field names, so this struct
/// is the stable surface; [`FittedModel`] itself stays free to grow.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionReport {
    region: HealthRegion,
    official_name: String,
    weeks: usize,
    first_week: NaiveDate,
    last_week: NaiveDate,
    intercept: Coefficient,
    ar: Coefficient,
    annual_sin: Coefficient,
    annual_cos: Coefficient,
    amplitude: f64,
    phase: f64,
    r_squared: f64,
    residual_variance: f64,
    lag1_autocorrelation: f64,
    aic: f64,
    bic: f64,
    forecast: Option<Vec<ForecastPoint>>,
}

impl RegionReport {
    /// Builds the report view of `model`, attaching `forecast` when the
    /// caller projected ahead.
    #[must_use]
    pub fn from_model(model: &FittedModel, forecast: Option<Vec<ForecastPoint>>) -> Self {
        Self {
            region: model.region(),
            official_name: model.region().official_name().to_string(),
            weeks: model.observations(),
            first_week: model.first_week(),
            last_week: model.last_week(),
            intercept: model.intercept(),
            ar: model.ar(),
            annual_sin: model.sin_coef(),
            annual_cos: model.cos_coef(),
            amplitude: model.amplitude(),
            phase: model.phase(),
            r_squared: model.r_squared(),
            residual_variance: model.residual_variance(),
            lag1_autocorrelation: model.lag1_autocorrelation(),
            aic: model.aic(),
            bic: model.bic(),
            forecast,
        }
    }
}
