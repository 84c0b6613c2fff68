//! Ridge regression solver (L2 regularization).

use crate::core::{
    Diagnosed, PenaltyScaling, RegressionOptions, RegressionOptionsBuilder, RegressionResult,
    SolverReport,
};
use crate::inference::ridge_covariance;
use crate::linalg::{gram_matrix, solve_normal_equations};
use crate::solvers::ols::OlsRegressor;
use crate::solvers::traits::{
    check_columns, check_features, check_rows, FittedRegressor, RegressionError, Regressor,
};
use crate::utils::augment;
use faer::{Col, Mat};

/// Ridge regression estimator with L2 regularization.
///
/// Minimizes: ||y - Xβ||² + α||β_slopes||²
///
/// The solution is: β = (XᵗX + αD)⁻¹Xᵗy, where D is the identity with a zero
/// in the intercept position. The intercept is never penalized.
///
/// When α = 0, this reduces to OLS.
///
/// # Example
///
/// ```rust,ignore
/// use linfit::solvers::{RidgeRegressor, Regressor, FittedRegressor};
/// use faer::{Mat, Col};
///
/// let fitted = RidgeRegressor::builder()
///     .with_intercept(true)
///     .alpha(1.0)
///     .build()
///     .fit(&x, &y)?;
///
/// let covariance = fitted.estimate_variance(&x, &y)?;
/// ```
#[derive(Debug, Clone)]
pub struct RidgeRegressor {
    options: RegressionOptions,
}

impl RidgeRegressor {
    /// Create a new Ridge regressor with the given options.
    pub fn new(options: RegressionOptions) -> Self {
        Self { options }
    }

    /// Create a builder for configuring the regressor.
    pub fn builder() -> RidgeRegressorBuilder {
        RidgeRegressorBuilder::default()
    }

    /// The configured penalty before scaling.
    pub fn alpha(&self) -> f64 {
        self.options.alpha
    }
}

impl Regressor for RidgeRegressor {
    type Fitted = FittedRidge;

    fn fit(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<Self::Fitted, RegressionError> {
        self.options.validate()?;
        check_rows(x, y)?;

        let n_samples = x.nrows();
        if n_samples == 0 {
            return Err(RegressionError::InsufficientObservations { needed: 1, got: 0 });
        }
        check_columns(x, self.options.with_intercept)?;

        let penalty = self.options.effective_alpha(n_samples);

        // When alpha = 0, delegate to OLS
        if penalty == 0.0 {
            let ols = OlsRegressor::new(RegressionOptions {
                solver: Default::default(),
                ..self.options.clone()
            });
            let ols_fitted = ols.fit(x, y)?;
            return Ok(FittedRidge {
                options: self.options.clone(),
                result: ols_fitted.result().clone(),
                penalty,
            });
        }

        let x_prepared = augment(x, self.options.with_intercept);
        let result = self.solve_ridge(&x_prepared, y, penalty)?;

        Ok(FittedRidge {
            options: self.options.clone(),
            result,
            penalty,
        })
    }
}

impl RidgeRegressor {
    /// Solve (XᵗX + αD)β = Xᵗy on a prepared design matrix.
    fn solve_ridge(
        &self,
        x_prepared: &Mat<f64>,
        y: &Col<f64>,
        penalty: f64,
    ) -> Result<RegressionResult, RegressionError> {
        let xtx_reg = gram_matrix(x_prepared, penalty, self.options.with_intercept);
        let xty = x_prepared.transpose() * y;

        let solution = solve_normal_equations(&xtx_reg, &xty, self.options.condition_threshold)?;
        let fitted_values = x_prepared * &solution.value;

        let mut result = RegressionResult::from_fit(
            solution.value,
            self.options.with_intercept,
            y,
            fitted_values,
            SolverReport::ClosedForm,
        );
        result.condition_number = Some(solution.condition_number);
        result.diagnostics = solution.diagnostics;
        Ok(result)
    }
}

/// A fitted Ridge regression model.
#[derive(Debug, Clone)]
pub struct FittedRidge {
    options: RegressionOptions,
    result: RegressionResult,
    /// Penalty added to the diagonal at fit time (after scaling).
    penalty: f64,
}

impl FittedRidge {
    /// Get the options used to fit this model.
    pub fn options(&self) -> &RegressionOptions {
        &self.options
    }

    /// Get the configured penalty.
    pub fn alpha(&self) -> f64 {
        self.options.alpha
    }

    /// Penalty actually applied, after `PenaltyScaling`.
    pub fn effective_alpha(&self) -> f64 {
        self.penalty
    }

    fn prepare(&self, x: &Mat<f64>) -> Result<Mat<f64>, RegressionError> {
        check_features(x, self.result.n_features())?;
        Ok(augment(x, self.options.with_intercept))
    }
}

impl FittedRegressor for FittedRidge {
    fn predict(&self, x: &Mat<f64>) -> Result<Col<f64>, RegressionError> {
        let x_prepared = self.prepare(x)?;
        Ok(&x_prepared * &self.result.beta)
    }

    /// Sandwich estimator σ̂²A⁻¹XᵗXA⁻¹ with A = XᵗX + αD.
    ///
    /// Always carries `Diagnostic::HomoskedasticityAssumed`.
    fn estimate_variance(
        &self,
        x: &Mat<f64>,
        y: &Col<f64>,
    ) -> Result<Diagnosed<Mat<f64>>, RegressionError> {
        check_rows(x, y)?;
        let x_prepared = self.prepare(x)?;
        ridge_covariance(
            &x_prepared,
            y,
            &self.result.beta,
            self.penalty,
            self.options.with_intercept,
            self.options.condition_threshold,
        )
    }

    fn result(&self) -> &RegressionResult {
        &self.result
    }
}

/// Builder for `RidgeRegressor`.
#[derive(Debug, Clone, Default)]
pub struct RidgeRegressorBuilder {
    builder: RegressionOptionsBuilder,
}

impl RidgeRegressorBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to include an intercept term.
    pub fn with_intercept(mut self, include: bool) -> Self {
        self.builder = self.builder.with_intercept(include);
        self
    }

    /// Set the regularization strength (α ≥ 0).
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.builder = self.builder.alpha(alpha);
        self
    }

    /// Set the penalty scaling convention.
    pub fn penalty_scaling(mut self, scaling: PenaltyScaling) -> Self {
        self.builder = self.builder.penalty_scaling(scaling);
        self
    }

    /// Set the condition number threshold for ill-conditioning diagnostics.
    pub fn condition_threshold(mut self, threshold: f64) -> Self {
        self.builder = self.builder.condition_threshold(threshold);
        self
    }

    /// Build the Ridge regressor. Options are validated when fitting.
    pub fn build(self) -> RidgeRegressor {
        RidgeRegressor::new(self.builder.build_unchecked())
    }
}
