//! Coefficient and goodness-of-fit report for any fitted estimator.

use crate::core::{r_squared_from, Diagnostic};
use crate::inference::CoefficientInference;
use crate::solvers::{FittedRegressor, RegressionError};
use faer::{Col, Mat};
use std::fmt;

/// Coefficients and goodness of fit of a model evaluated on some data.
#[derive(Debug, Clone)]
pub struct FitSummary {
    /// Full coefficient vector β (intercept first when present).
    pub coefficients: Col<f64>,
    /// R² = 1 − SS_res / SS_tot on the summarized data.
    pub r_squared: f64,
    /// R² adjusted for the number of parameters.
    pub adj_r_squared: f64,
    pub n_observations: usize,
    pub n_parameters: usize,
    pub std_errors: Option<Col<f64>>,
    pub t_statistics: Option<Col<f64>>,
    pub p_values: Option<Col<f64>>,
    pub conf_interval_lower: Option<Col<f64>>,
    pub conf_interval_upper: Option<Col<f64>>,
    pub confidence_level: f64,
    /// Diagnostics raised by the variance estimate.
    pub diagnostics: Vec<Diagnostic>,
}

/// Summarize a fitted model on `(x, y)` with 95% confidence intervals.
pub fn summary<M: FittedRegressor + ?Sized>(
    model: &M,
    x: &Mat<f64>,
    y: &Col<f64>,
) -> Result<FitSummary, RegressionError> {
    summary_with_level(model, x, y, 0.95)
}

/// Summarize a fitted model on `(x, y)` at the given confidence level.
///
/// Inference columns are `None` when the data leave no residual degrees of
/// freedom or the model cannot estimate its variance on them, such as a GLS
/// fit evaluated on rows its Σ does not cover.
pub fn summary_with_level<M: FittedRegressor + ?Sized>(
    model: &M,
    x: &Mat<f64>,
    y: &Col<f64>,
    confidence_level: f64,
) -> Result<FitSummary, RegressionError> {
    if x.nrows() != y.nrows() {
        return Err(RegressionError::DimensionMismatch {
            x_rows: x.nrows(),
            y_len: y.nrows(),
        });
    }
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(RegressionError::InvalidInput(format!(
            "confidence level must be in (0, 1), got {}",
            confidence_level
        )));
    }

    let beta = model.beta().clone();
    let predictions = model.predict(x)?;

    let n = y.nrows();
    let p = beta.nrows();
    let ss_res: f64 = y
        .iter()
        .zip(predictions.iter())
        .map(|(&yi, &pi)| (yi - pi).powi(2))
        .sum();
    let r_squared = r_squared_from(y, ss_res);

    let df_total = n as f64 - 1.0;
    let df_resid = n as f64 - p as f64;
    let adj_r_squared = if df_resid > 0.0 && df_total > 0.0 {
        1.0 - (1.0 - r_squared) * df_total / df_resid
    } else {
        f64::NAN
    };

    let mut report = FitSummary {
        coefficients: beta,
        r_squared,
        adj_r_squared,
        n_observations: n,
        n_parameters: p,
        std_errors: None,
        t_statistics: None,
        p_values: None,
        conf_interval_lower: None,
        conf_interval_upper: None,
        confidence_level,
        diagnostics: Vec::new(),
    };

    if df_resid <= 0.0 {
        return Ok(report);
    }

    // Data the variance cannot be estimated on (too few rows, or a GLS Σ
    // sized for the training rows) still gets coefficients and R²
    let covariance = match model.estimate_variance(x, y) {
        Ok(cov) => cov,
        Err(
            e @ (RegressionError::InsufficientObservations { .. }
            | RegressionError::SigmaDimensionMismatch { .. }
            | RegressionError::SingularMatrix
            | RegressionError::NumericalError(_)),
        ) => {
            log::debug!("summary without inference columns: {}", e);
            return Ok(report);
        }
        Err(e) => return Err(e),
    };

    let se = CoefficientInference::standard_errors(&covariance.value);
    let t_stats = CoefficientInference::t_statistics(&report.coefficients, &se);
    let p_vals = CoefficientInference::p_values(&t_stats, df_resid);
    let (lower, upper) = CoefficientInference::confidence_intervals(
        &report.coefficients,
        &se,
        df_resid,
        confidence_level,
    );

    report.std_errors = Some(se);
    report.t_statistics = Some(t_stats);
    report.p_values = Some(p_vals);
    report.conf_interval_lower = Some(lower);
    report.conf_interval_upper = Some(upper);
    report.diagnostics = covariance.diagnostics;

    Ok(report)
}

impl fmt::Display for FitSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "n = {}, p = {}, R² = {:.6}, adj. R² = {:.6}",
            self.n_observations, self.n_parameters, self.r_squared, self.adj_r_squared
        )?;
        writeln!(
            f,
            "{:>6} {:>14} {:>14} {:>10} {:>10}",
            "term", "estimate", "std.error", "t", "p"
        )?;

        for j in 0..self.coefficients.nrows() {
            let pick = |c: &Option<Col<f64>>| c.as_ref().map_or(f64::NAN, |c| c[j]);
            writeln!(
                f,
                "{:>6} {:>14.6} {:>14.6} {:>10.3} {:>10.4}",
                format!("b{}", j),
                self.coefficients[j],
                pick(&self.std_errors),
                pick(&self.t_statistics),
                pick(&self.p_values)
            )?;
        }

        for diagnostic in &self.diagnostics {
            writeln!(f, "note: {}", diagnostic)?;
        }
        Ok(())
    }
}
