#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! AR(1) plus annual-cycle model fitting for weekly trolley rates.
//!
//! The model is
//!
//! ```text
//! rate[t] = c + φ·rate[t-1] + A·sin(2π·t/52 + θ) + ε[t]
//! ```
//!
//! fitted by ordinary least squares over a dense weekly window: the
//! seasonal term is linear in `a = A·cos θ` and `b = A·sin θ`, so the
//! whole fit reduces to one normal-equation solve. Fitting is a pure
//! function of the input series; the same window always yields the
//! same [`FittedModel`], bit for bit.

mod model;
mod ols;

use std::f64::consts::TAU;

use chrono::{Days, NaiveDate};
use serde::Serialize;
use thiserror::Error;
use trolley_watch_region_models::HealthRegion;
use trolley_watch_trolley_models::WeeklyRateSeries;

/// Minimum observed weeks for a fit: two full annual cycles. Below
/// this the seasonal term is underdetermined.
pub const MIN_OBSERVATIONS: usize = 104;

/// Length of the annual cycle in weeks.
pub const ANNUAL_PERIOD_WEEKS: f64 = 52.0;

/// Errors from fitting a weekly rate series.
#[derive(Debug, Error)]
pub enum FitError {
    /// The fitting window is too short for the annual term.
    #[error("Need at least {needed} weekly observations, got {got}")]
    InsufficientData {
        /// Minimum observed weeks required.
        needed: usize,
        /// Observed weeks actually available.
        got: usize,
    },
    /// The series still has missing weeks; a gap policy must run first.
    /// This component never guesses at missing values.
    #[error(
        "{} series has {missing} missing week(s); resolve gaps before fitting",
        region.official_name()
    )]
    GapsPresent {
        /// The region whose series is gappy.
        region: HealthRegion,
        /// Number of missing weeks.
        missing: usize,
    },
    /// The normal equations could not be solved, e.g. for a constant
    /// series whose lag column collapses into the intercept.
    #[error("Singular design matrix; the series may be constant")]
    Singular,
}

/// A fitted coefficient paired with its standard error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Coefficient {
    /// Point estimate.
    pub value: f64,
    /// Standard error from the unbiased residual variance.
    pub std_error: f64,
}

/// One projected week from [`FittedModel::forecast`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    /// Monday of the projected week.
    pub week_start: NaiveDate,
    /// Projected rate per 10,000 population.
    pub rate: f64,
}

/// A fitted AR(1) plus annual-cycle model for one region's window.
///
/// Immutable once produced; every field is exposed through accessors.
#[derive(Debug, Clone)]
pub struct FittedModel {
    region: HealthRegion,
    intercept: Coefficient,
    ar: Coefficient,
    sin_coef: Coefficient,
    cos_coef: Coefficient,
    amplitude: f64,
    phase: f64,
    fitted: Vec<f64>,
    residuals: Vec<f64>,
    residual_variance: f64,
    r_squared: f64,
    lag1_autocorr: f64,
    aic: f64,
    bic: f64,
    observations: usize,
    first_week: NaiveDate,
    last_week: NaiveDate,
    last_rate: f64,
}

impl FittedModel {
    /// The region this model was fitted for.
    #[must_use]
    pub const fn region(&self) -> HealthRegion {
        self.region
    }

    /// Intercept `c`.
    #[must_use]
    pub const fn intercept(&self) -> Coefficient {
        self.intercept
    }

    /// Autoregressive coefficient `φ`.
    #[must_use]
    pub const fn ar(&self) -> Coefficient {
        self.ar
    }

    /// Coefficient `a` on `sin(2π·t/52)`.
    #[must_use]
    pub const fn sin_coef(&self) -> Coefficient {
        self.sin_coef
    }

    /// Coefficient `b` on `cos(2π·t/52)`.
    #[must_use]
    pub const fn cos_coef(&self) -> Coefficient {
        self.cos_coef
    }

    /// Annual-cycle amplitude `A = √(a² + b²)`. Never negative.
    #[must_use]
    pub const fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// Annual-cycle phase `θ = atan2(b, a)`, in radians.
    #[must_use]
    pub const fn phase(&self) -> f64 {
        self.phase
    }

    /// Fitted values for week indexes `1..n`; the first week has no
    /// predecessor and is never a regression target.
    #[must_use]
    pub fn fitted(&self) -> &[f64] {
        &self.fitted
    }

    /// Residuals aligned with [`FittedModel::fitted`].
    #[must_use]
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// Unbiased residual variance, `RSS / (n_eff - 4)`.
    #[must_use]
    pub const fn residual_variance(&self) -> f64 {
        self.residual_variance
    }

    /// Coefficient of determination over the regression targets.
    #[must_use]
    pub const fn r_squared(&self) -> f64 {
        self.r_squared
    }

    /// Lag-1 autocorrelation of the residuals. Values near zero mean
    /// the model has whitened the series.
    #[must_use]
    pub const fn lag1_autocorrelation(&self) -> f64 {
        self.lag1_autocorr
    }

    /// Akaike information criterion.
    #[must_use]
    pub const fn aic(&self) -> f64 {
        self.aic
    }

    /// Bayesian information criterion.
    #[must_use]
    pub const fn bic(&self) -> f64 {
        self.bic
    }

    /// Number of observed weeks in the fitted window.
    #[must_use]
    pub const fn observations(&self) -> usize {
        self.observations
    }

    /// Monday of the window's first week.
    #[must_use]
    pub const fn first_week(&self) -> NaiveDate {
        self.first_week
    }

    /// Monday of the window's last week.
    #[must_use]
    pub const fn last_week(&self) -> NaiveDate {
        self.last_week
    }

    /// Projects the series forward by `horizon` weeks with `ε = 0`.
    ///
    /// Each step feeds the previous projection back through the
    /// autoregression while the annual cycle keeps advancing from the
    /// end of the fitted window.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // week indexes stay far below 2^52
    pub fn forecast(&self, horizon: usize) -> Vec<ForecastPoint> {
        let mut out = Vec::with_capacity(horizon);
        let mut previous = self.last_rate;
        let mut week = self.last_week;
        for step in 1..=horizon {
            let t = (self.observations - 1 + step) as f64;
            let angle = TAU * t / ANNUAL_PERIOD_WEEKS + self.phase;
            let rate = self.intercept.value + self.ar.value * previous + self.amplitude * angle.sin();
            week = week + Days::new(7);
            out.push(ForecastPoint {
                week_start: week,
                rate,
            });
            previous = rate;
        }
        out
    }
}

/// Fits the AR(1) plus annual-cycle model to one region's weekly
/// series.
///
/// # Errors
///
/// Returns [`FitError::GapsPresent`] if any week in the series is
/// missing, [`FitError::InsufficientData`] when fewer than
/// [`MIN_OBSERVATIONS`] weeks are available, and [`FitError::Singular`]
/// when the normal equations cannot be solved.
pub fn fit_model(series: &WeeklyRateSeries) -> Result<FittedModel, FitError> {
    let missing = series.gap_count();
    if missing > 0 {
        return Err(FitError::GapsPresent {
            region: series.region(),
            missing,
        });
    }

    let values: Vec<f64> = series.points().iter().filter_map(|p| p.rate).collect();
    if values.len() < MIN_OBSERVATIONS {
        return Err(FitError::InsufficientData {
            needed: MIN_OBSERVATIONS,
            got: values.len(),
        });
    }
    let (Some(first_week), Some(last_week)) = (series.first_week(), series.last_week()) else {
        return Err(FitError::InsufficientData {
            needed: MIN_OBSERVATIONS,
            got: 0,
        });
    };
    let last_rate = values[values.len() - 1];

    let regression = model::regress(&values)?;
    let [c, phi, a, b] = regression.beta;
    let [c_se, phi_se, a_se, b_se] = regression.std_errors;

    let amplitude = a.hypot(b);
    let phase = b.atan2(a);

    log::debug!(
        "{}: fitted {} week window, φ={phi:.3}, A={amplitude:.3}, R²={:.3}",
        series.region(),
        values.len(),
        regression.r_squared
    );

    Ok(FittedModel {
        region: series.region(),
        intercept: Coefficient {
            value: c,
            std_error: c_se,
        },
        ar: Coefficient {
            value: phi,
            std_error: phi_se,
        },
        sin_coef: Coefficient {
            value: a,
            std_error: a_se,
        },
        cos_coef: Coefficient {
            value: b,
            std_error: b_se,
        },
        amplitude,
        phase,
        fitted: regression.fitted,
        residuals: regression.residuals,
        residual_variance: regression.residual_variance,
        r_squared: regression.r_squared,
        lag1_autocorr: regression.lag1_autocorr,
        aic: regression.aic,
        bic: regression.bic,
        observations: values.len(),
        first_week,
        last_week,
        last_rate,
    })
}
