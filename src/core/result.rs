//! Regression result structures.

use super::diagnostic::Diagnostic;
use faer::Col;

/// How the coefficients of a fit were obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolverReport {
    /// Closed-form solve of the (possibly penalized or whitened) normal equations.
    ClosedForm,
    /// Gradient descent, with the number of iterations performed.
    GradientDescent { iterations: usize, converged: bool },
}

/// Complete result from a regression fit.
#[derive(Debug, Clone)]
pub struct RegressionResult {
    // ========== Core Results ==========
    /// Full coefficient vector β over the prepared design matrix.
    /// With an intercept, element 0 is the intercept.
    pub beta: Col<f64>,

    /// Estimated coefficients (excluding intercept).
    pub coefficients: Col<f64>,

    /// Intercept term (if model was fit with intercept).
    pub intercept: Option<f64>,

    /// Residuals (y - fitted_values).
    pub residuals: Col<f64>,

    /// Fitted values (predictions on training data).
    pub fitted_values: Col<f64>,

    /// Number of parameters (including intercept if present).
    pub n_parameters: usize,

    /// Number of observations.
    pub n_observations: usize,

    // ========== Fit Statistics ==========
    /// Coefficient of determination (R²).
    pub r_squared: f64,

    /// Adjusted R².
    pub adj_r_squared: f64,

    /// Root mean squared error.
    pub rmse: f64,

    /// Residual variance estimate RSS / (n - p).
    pub mse: f64,

    /// Gaussian log-likelihood.
    pub log_likelihood: f64,

    /// Akaike Information Criterion.
    pub aic: f64,

    /// Bayesian Information Criterion.
    pub bic: f64,

    // ========== Numerical Report ==========
    /// Condition number of the normal matrix (closed-form fits only).
    pub condition_number: Option<f64>,

    /// How the coefficients were computed.
    pub solver: SolverReport,

    /// Advisory conditions raised during the fit.
    pub diagnostics: Vec<Diagnostic>,
}

impl RegressionResult {
    /// Assemble a result from a coefficient vector and the training data fit.
    ///
    /// `fitted_values` must be `X_prepared · beta` for the training design.
    pub(crate) fn from_fit(
        beta: Col<f64>,
        with_intercept: bool,
        y: &Col<f64>,
        fitted_values: Col<f64>,
        solver: SolverReport,
    ) -> Self {
        let n = y.nrows();
        let n_params = beta.nrows();

        let (intercept, coefficients) = split_beta(&beta, with_intercept);
        let residuals = Col::from_fn(n, |i| y[i] - fitted_values[i]);

        let rss: f64 = residuals.iter().map(|&r| r.powi(2)).sum();
        let r_squared = r_squared_from(y, rss);

        // Adjusted R²
        let df_total = n as f64 - 1.0;
        let df_resid = n as f64 - n_params as f64;
        let adj_r_squared = if df_resid > 0.0 && df_total > 0.0 {
            1.0 - (1.0 - r_squared) * df_total / df_resid
        } else {
            f64::NAN
        };

        let mse = if df_resid > 0.0 {
            rss / df_resid
        } else {
            f64::NAN
        };
        let rmse = mse.sqrt();

        // Information criteria use the ML variance RSS / n
        let sigma2_ml = rss / n as f64;
        let log_likelihood = if sigma2_ml > 0.0 {
            -0.5 * n as f64 * (1.0 + (2.0 * std::f64::consts::PI).ln() + sigma2_ml.ln())
        } else {
            f64::NAN
        };
        let k = n_params as f64 + 1.0; // coefficients + error variance
        let aic = if log_likelihood.is_finite() {
            2.0 * k - 2.0 * log_likelihood
        } else {
            f64::NAN
        };
        let bic = if log_likelihood.is_finite() {
            k * (n as f64).ln() - 2.0 * log_likelihood
        } else {
            f64::NAN
        };

        Self {
            beta,
            coefficients,
            intercept,
            residuals,
            fitted_values,
            n_parameters: n_params,
            n_observations: n,
            r_squared,
            adj_r_squared,
            rmse,
            mse,
            log_likelihood,
            aic,
            bic,
            condition_number: None,
            solver,
            diagnostics: Vec::new(),
        }
    }

    /// Residual degrees of freedom (n - p).
    pub fn residual_df(&self) -> usize {
        self.n_observations.saturating_sub(self.n_parameters)
    }

    /// Model degrees of freedom (p - 1 if intercept, else p).
    pub fn model_df(&self) -> usize {
        if self.intercept.is_some() {
            self.n_parameters.saturating_sub(1)
        } else {
            self.n_parameters
        }
    }

    /// Number of features the model was fit on (excluding intercept).
    pub fn n_features(&self) -> usize {
        self.coefficients.nrows()
    }

    /// Residual sum of squares (RSS).
    pub fn rss(&self) -> f64 {
        self.residuals.iter().map(|&r| r.powi(2)).sum()
    }

    /// Total sum of squares (TSS).
    pub fn tss(&self) -> f64 {
        let n = self.n_observations as f64;
        let y_mean = self
            .fitted_values
            .iter()
            .zip(self.residuals.iter())
            .map(|(&f, &r)| f + r)
            .sum::<f64>()
            / n;

        self.fitted_values
            .iter()
            .zip(self.residuals.iter())
            .map(|(&f, &r)| (f + r - y_mean).powi(2))
            .sum()
    }

    /// Whether any ill-conditioning diagnostic was raised during the fit.
    pub fn is_ill_conditioned(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_conditioning)
    }

    /// Number of gradient descent iterations, if the fit used gradient descent.
    pub fn iterations(&self) -> Option<usize> {
        match self.solver {
            SolverReport::GradientDescent { iterations, .. } => Some(iterations),
            SolverReport::ClosedForm => None,
        }
    }
}

/// Split β into (intercept, slope coefficients).
pub(crate) fn split_beta(beta: &Col<f64>, with_intercept: bool) -> (Option<f64>, Col<f64>) {
    if with_intercept {
        let p = beta.nrows().saturating_sub(1);
        (Some(beta[0]), Col::from_fn(p, |j| beta[j + 1]))
    } else {
        (None, beta.clone())
    }
}

/// R² = 1 - RSS / TSS, with the constant-response case mapped to 1 or 0.
///
/// The response counts as constant when TSS is within rounding of zero
/// relative to Σy², since a mean like 0.1 is not representable and leaves
/// a TSS of order ε² instead of exactly zero.
pub(crate) fn r_squared_from(y: &Col<f64>, rss: f64) -> f64 {
    let n = y.nrows();
    if n == 0 {
        return f64::NAN;
    }
    let y_mean: f64 = y.iter().sum::<f64>() / n as f64;
    let tss: f64 = y.iter().map(|&yi| (yi - y_mean).powi(2)).sum();
    let sum_sq: f64 = y.iter().map(|&yi| yi * yi).sum();
    let tol = n as f64 * f64::EPSILON * sum_sq;

    if tss > tol {
        1.0 - rss / tss
    } else if rss <= tol.max(1e-10) {
        1.0
    } else {
        0.0
    }
}
