//! Generalized Least Squares solver.

use crate::core::{
    Diagnosed, RegressionOptions, RegressionOptionsBuilder, RegressionResult, SolverReport,
};
use crate::inference::gls_covariance;
use crate::linalg::{gram_matrix, solve_normal_equations, Whitener};
use crate::solvers::traits::{
    check_columns, check_features, check_rows, FittedRegressor, RegressionError, Regressor,
};
use crate::utils::augment;
use faer::{Col, Mat};

/// Generalized Least Squares regression estimator.
///
/// Minimizes: (y - Xβ)ᵗ Σ⁻¹ (y - Xβ)
///
/// This is equivalent to transforming the problem with the Cholesky factor
/// Σ = LLᵗ: X → L⁻¹X, y → L⁻¹y, then applying OLS, which gives
/// β = (XᵗΣ⁻¹X)⁻¹XᵗΣ⁻¹y.
///
/// When Σ is the identity (or absent), this reduces exactly to OLS.
///
/// # Example
///
/// ```rust,ignore
/// use linfit::solvers::{GlsRegressor, Regressor, FittedRegressor};
/// use faer::{Mat, Col};
///
/// // AR(1) error covariance
/// let sigma = Mat::from_fn(100, 100, |i, j| 0.7_f64.powi((i as i32 - j as i32).abs()));
///
/// let fitted = GlsRegressor::builder()
///     .with_intercept(true)
///     .sigma(sigma)
///     .build()
///     .fit(&x, &y)?;
/// ```
#[derive(Debug, Clone)]
pub struct GlsRegressor {
    options: RegressionOptions,
    sigma: Option<Mat<f64>>,
}

impl GlsRegressor {
    /// Create a new GLS regressor with the given options.
    pub fn new(options: RegressionOptions) -> Self {
        Self {
            options,
            sigma: None,
        }
    }

    /// Set the error covariance matrix.
    pub fn with_sigma(mut self, sigma: Mat<f64>) -> Self {
        self.sigma = Some(sigma);
        self
    }

    /// Create a builder for configuring the regressor.
    pub fn builder() -> GlsRegressorBuilder {
        GlsRegressorBuilder::default()
    }

    /// Fit with an explicit error covariance, overriding any configured one.
    pub fn fit_with_sigma(
        &self,
        x: &Mat<f64>,
        y: &Col<f64>,
        sigma: &Mat<f64>,
    ) -> Result<FittedGls, RegressionError> {
        self.options.validate()?;
        check_rows(x, y)?;

        let n_samples = x.nrows();
        if sigma.nrows() != n_samples || sigma.ncols() != n_samples {
            return Err(RegressionError::SigmaDimensionMismatch {
                expected: n_samples,
                rows: sigma.nrows(),
                cols: sigma.ncols(),
            });
        }

        let whitener = Whitener::new(sigma)?;
        self.fit_whitened(x, y, Some(whitener))
    }

    fn fit_whitened(
        &self,
        x: &Mat<f64>,
        y: &Col<f64>,
        whitener: Option<Whitener>,
    ) -> Result<FittedGls, RegressionError> {
        let n_samples = x.nrows();
        if n_samples == 0 {
            return Err(RegressionError::InsufficientObservations { needed: 1, got: 0 });
        }
        check_columns(x, self.options.with_intercept)?;

        let x_prepared = augment(x, self.options.with_intercept);
        let (x_white, y_white) = match &whitener {
            Some(w) => (w.whiten_matrix(&x_prepared), w.whiten_vector(y)),
            None => (x_prepared.clone(), y.clone()),
        };

        let xtx = gram_matrix(&x_white, 0.0, false);
        let xty = x_white.transpose() * &y_white;
        let solution = solve_normal_equations(&xtx, &xty, self.options.condition_threshold)?;

        // Residuals and R² on the original scale
        let fitted_values = &x_prepared * &solution.value;
        let mut result = RegressionResult::from_fit(
            solution.value,
            self.options.with_intercept,
            y,
            fitted_values,
            SolverReport::ClosedForm,
        );
        result.condition_number = Some(solution.condition_number);
        result.diagnostics = solution.diagnostics;

        Ok(FittedGls {
            options: self.options.clone(),
            result,
            whitener,
        })
    }
}

impl Regressor for GlsRegressor {
    type Fitted = FittedGls;

    fn fit(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<Self::Fitted, RegressionError> {
        match &self.sigma {
            Some(sigma) => self.fit_with_sigma(x, y, sigma),
            None => {
                self.options.validate()?;
                check_rows(x, y)?;
                self.fit_whitened(x, y, None)
            }
        }
    }
}

/// A fitted GLS regression model.
#[derive(Debug, Clone)]
pub struct FittedGls {
    options: RegressionOptions,
    result: RegressionResult,
    /// Whitening operator of the fit; `None` means Σ = I.
    whitener: Option<Whitener>,
}

impl FittedGls {
    /// Get the options used to fit this model.
    pub fn options(&self) -> &RegressionOptions {
        &self.options
    }

    fn prepare(&self, x: &Mat<f64>) -> Result<Mat<f64>, RegressionError> {
        check_features(x, self.result.n_features())?;
        Ok(augment(x, self.options.with_intercept))
    }
}

impl FittedRegressor for FittedGls {
    fn predict(&self, x: &Mat<f64>) -> Result<Col<f64>, RegressionError> {
        let x_prepared = self.prepare(x)?;
        Ok(&x_prepared * &self.result.beta)
    }

    /// (XᵗΣ⁻¹X)⁻¹ for the Σ used at fit time.
    ///
    /// X must have as many rows as Σ; `y` is only checked for length.
    fn estimate_variance(
        &self,
        x: &Mat<f64>,
        y: &Col<f64>,
    ) -> Result<Diagnosed<Mat<f64>>, RegressionError> {
        check_rows(x, y)?;
        let x_prepared = self.prepare(x)?;

        let x_white = match &self.whitener {
            Some(w) => {
                if w.dimension() != x.nrows() {
                    return Err(RegressionError::SigmaDimensionMismatch {
                        expected: x.nrows(),
                        rows: w.dimension(),
                        cols: w.dimension(),
                    });
                }
                w.whiten_matrix(&x_prepared)
            }
            None => x_prepared,
        };

        gls_covariance(&x_white, self.options.condition_threshold)
    }

    fn result(&self) -> &RegressionResult {
        &self.result
    }
}

/// Builder for `GlsRegressor`.
#[derive(Debug, Clone, Default)]
pub struct GlsRegressorBuilder {
    builder: RegressionOptionsBuilder,
    sigma: Option<Mat<f64>>,
}

impl GlsRegressorBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to include an intercept term.
    pub fn with_intercept(mut self, include: bool) -> Self {
        self.builder = self.builder.with_intercept(include);
        self
    }

    /// Set the error covariance matrix Σ (n_samples × n_samples).
    pub fn sigma(mut self, sigma: Mat<f64>) -> Self {
        self.sigma = Some(sigma);
        self
    }

    /// Set the condition number threshold for ill-conditioning diagnostics.
    pub fn condition_threshold(mut self, threshold: f64) -> Self {
        self.builder = self.builder.condition_threshold(threshold);
        self
    }

    /// Build the GLS regressor.
    pub fn build(self) -> GlsRegressor {
        GlsRegressor {
            options: self.builder.build_unchecked(),
            sigma: self.sigma,
        }
    }
}
