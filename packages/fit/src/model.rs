//! Least-squares estimation of the AR(1) plus annual-cycle regression.
//!
//! The model is linear in `(c, φ, a, b)` once the seasonal term
//! `A·sin(ωt + θ)` is rewritten as `a·sin(ωt) + b·cos(ωt)`, so the
//! parameters come straight from the normal equations with no iterative
//! optimizer, and refitting the same window always reproduces the same
//! coefficients bit for bit.

use std::f64::consts::TAU;

use crate::ols::{invert, mat_vec};
use crate::{ANNUAL_PERIOD_WEEKS, FitError};

/// Number of regression predictors: intercept, previous week's rate,
/// and the sin/cos pair of the annual cycle.
pub(crate) const NUM_PREDICTORS: usize = 4;

/// Raw least-squares output over a dense weekly window.
///
/// `fitted` and `residuals` are aligned to week indexes `1..n`; the
/// first week has no predecessor and is never a regression target.
pub(crate) struct Regression {
    pub beta: [f64; NUM_PREDICTORS],
    pub std_errors: [f64; NUM_PREDICTORS],
    pub fitted: Vec<f64>,
    pub residuals: Vec<f64>,
    pub residual_variance: f64,
    pub r_squared: f64,
    pub lag1_autocorr: f64,
    pub aic: f64,
    pub bic: f64,
}

/// One design row: `[1, y[t-1], sin(ωt), cos(ωt)]` for target `y[t]`.
fn design_row(values: &[f64], t: usize) -> [f64; NUM_PREDICTORS] {
    #[allow(clippy::cast_precision_loss)] // week indexes stay far below 2^52
    let angle = TAU * (t as f64) / ANNUAL_PERIOD_WEEKS;
    [1.0, values[t - 1], angle.sin(), angle.cos()]
}

/// Fits the regression over a dense window of weekly rates.
///
/// The caller is responsible for the minimum-length check; this
/// function only requires two values.
#[allow(clippy::cast_precision_loss)] // row counts stay far below 2^52
pub(crate) fn regress(values: &[f64]) -> Result<Regression, FitError> {
    let n = values.len();
    let rows = n - 1;

    let mut xtx = [[0.0; NUM_PREDICTORS]; NUM_PREDICTORS];
    let mut xty = [0.0; NUM_PREDICTORS];
    for t in 1..n {
        let x = design_row(values, t);
        let y = values[t];
        for (i, xi) in x.iter().enumerate() {
            xty[i] += xi * y;
            for (j, xj) in x.iter().enumerate() {
                xtx[i][j] += xi * xj;
            }
        }
    }

    let xtx_inv = invert(xtx).ok_or(FitError::Singular)?;
    let beta = mat_vec(&xtx_inv, &xty);

    let mut fitted = Vec::with_capacity(rows);
    let mut residuals = Vec::with_capacity(rows);
    let mut rss = 0.0;
    for t in 1..n {
        let x = design_row(values, t);
        let prediction: f64 = x.iter().zip(beta.iter()).map(|(a, b)| a * b).sum();
        let residual = values[t] - prediction;
        rss += residual * residual;
        fitted.push(prediction);
        residuals.push(residual);
    }

    let n_eff = rows as f64;
    let k = NUM_PREDICTORS as f64;

    let target_mean = values[1..].iter().sum::<f64>() / n_eff;
    let tss: f64 = values[1..].iter().map(|y| (y - target_mean).powi(2)).sum();
    let r_squared = if tss > f64::EPSILON {
        1.0 - rss / tss
    } else {
        0.0
    };

    let lag1_autocorr = lag1_autocorrelation(&residuals);

    // Unbiased variance for the coefficient standard errors.
    let residual_variance = rss / (n_eff - k);
    let mut std_errors = [0.0; NUM_PREDICTORS];
    for i in 0..NUM_PREDICTORS {
        std_errors[i] = (residual_variance * xtx_inv[i][i]).sqrt();
    }

    // Gaussian log-likelihood at the MLE variance, for the information
    // criteria. The floor keeps the log finite on a perfect fit.
    let sigma2_mle = (rss / n_eff).max(f64::MIN_POSITIVE);
    let log_likelihood = -0.5 * n_eff * (1.0 + sigma2_mle.ln() + TAU.ln());
    let aic = -2.0 * log_likelihood + 2.0 * k;
    let bic = -2.0 * log_likelihood + k * n_eff.ln();

    Ok(Regression {
        beta,
        std_errors,
        fitted,
        residuals,
        residual_variance,
        r_squared,
        lag1_autocorr,
        aic,
        bic,
    })
}

/// Lag-1 autocorrelation of the residual sequence. Near zero for
/// residuals the model has fully whitened.
fn lag1_autocorrelation(residuals: &[f64]) -> f64 {
    let denominator: f64 = residuals.iter().map(|r| r * r).sum();
    if denominator <= f64::EPSILON {
        return 0.0;
    }
    let numerator: f64 = residuals.windows(2).map(|w| w[0] * w[1]).sum();
    numerator / denominator
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn recovers_exact_autoregressive_relationship() {
        // y[t] = 2 + 0.5·y[t-1] exactly, no seasonal component.
        let mut values = vec![10.0];
        for t in 1..40 {
            values.push(2.0 + 0.5 * values[t - 1]);
        }

        let regression = regress(&values).unwrap();
        assert_relative_eq!(regression.beta[0], 2.0, epsilon = 1e-8);
        assert_relative_eq!(regression.beta[1], 0.5, epsilon = 1e-8);
        assert_relative_eq!(regression.beta[2], 0.0, epsilon = 1e-8);
        assert_relative_eq!(regression.beta[3], 0.0, epsilon = 1e-8);
        assert!(regression.r_squared > 0.999);
        for residual in &regression.residuals {
            assert!(residual.abs() < 1e-8);
        }
    }

    #[test]
    fn constant_series_is_singular() {
        // A constant lag column is collinear with the intercept.
        let values = vec![5.0; 30];
        assert!(matches!(regress(&values), Err(FitError::Singular)));
    }

    #[test]
    fn diagnostics_are_finite_and_bounded() {
        let mut values = vec![4.0];
        for t in 1..80 {
            #[allow(clippy::cast_precision_loss)]
            let noise = 0.3 * (t as f64 * 0.79).sin();
            values.push(1.0 + 0.4 * values[t - 1] + noise);
        }

        let regression = regress(&values).unwrap();
        assert!(regression.aic.is_finite());
        assert!(regression.bic.is_finite());
        assert!(regression.residual_variance > 0.0);
        assert!(regression.r_squared <= 1.0);
        assert!(regression.lag1_autocorr.abs() <= 1.0);
        for se in &regression.std_errors {
            assert!(se.is_finite());
            assert!(*se >= 0.0);
        }
    }

    #[test]
    fn bic_penalizes_harder_than_aic_on_long_windows() {
        let mut values = vec![4.0];
        for t in 1..120 {
            #[allow(clippy::cast_precision_loss)]
            let noise = 0.3 * (t as f64 * 0.79).sin();
            values.push(1.0 + 0.4 * values[t - 1] + noise);
        }

        let regression = regress(&values).unwrap();
        // ln(n_eff) > 2 once n_eff > e², so BIC's complexity term wins.
        assert!(regression.bic > regression.aic);
    }

    #[test]
    fn fitted_and_residuals_cover_all_targets() {
        let mut values = vec![4.0];
        for t in 1..30 {
            #[allow(clippy::cast_precision_loss)]
            let noise = 0.2 * (t as f64 * 1.3).sin();
            values.push(1.0 + 0.3 * values[t - 1] + noise);
        }

        let regression = regress(&values).unwrap();
        assert_eq!(regression.fitted.len(), values.len() - 1);
        assert_eq!(regression.residuals.len(), values.len() - 1);
        for (i, residual) in regression.residuals.iter().enumerate() {
            assert_relative_eq!(
                regression.fitted[i] + residual,
                values[i + 1],
                epsilon = 1e-12
            );
        }
    }
}
