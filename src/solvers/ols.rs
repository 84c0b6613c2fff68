//! Ordinary Least Squares regression solver.

use crate::core::{
    Diagnosed, Diagnostic, RegressionOptions, RegressionOptionsBuilder, RegressionResult,
    SolverReport, SolverType,
};
use crate::inference::ols_covariance;
use crate::linalg::{gram_matrix, solve_normal_equations};
use crate::solvers::gradient_descent::GradientDescent;
use crate::solvers::traits::{
    check_columns, check_features, check_rows, FittedRegressor, RegressionError, Regressor,
};
use crate::utils::augment;
use faer::{Col, Mat};

/// Ordinary Least Squares regression estimator.
///
/// Solves the normal equations β = (XᵗX)⁻¹Xᵗy, or minimizes the mean squared
/// error by gradient descent when `SolverType::GradientDescent` is selected.
/// An ill-conditioned XᵗX is reported through [`Diagnostic`]s on the result;
/// an exactly singular one is solved with the pseudo-inverse.
///
/// # Example
///
/// ```rust,ignore
/// use linfit::solvers::{OlsRegressor, Regressor, FittedRegressor};
/// use faer::{Mat, Col};
///
/// let x = Mat::from_fn(100, 2, |i, j| ((i * (j + 3)) % 17) as f64);
/// let y = Col::from_fn(100, |i| 1.0 + 2.0 * x[(i, 0)] - x[(i, 1)]);
///
/// let fitted = OlsRegressor::builder()
///     .with_intercept(true)
///     .build()
///     .fit(&x, &y)?;
///
/// println!("R² = {}", fitted.r_squared());
/// println!("β = {:?}", fitted.beta());
/// ```
#[derive(Debug, Clone)]
pub struct OlsRegressor {
    options: RegressionOptions,
}

impl OlsRegressor {
    /// Create a new OLS regressor with the given options.
    pub fn new(options: RegressionOptions) -> Self {
        Self { options }
    }

    /// Create a builder for configuring the regressor.
    pub fn builder() -> OlsRegressorBuilder {
        OlsRegressorBuilder::default()
    }

    /// The options this regressor fits with.
    pub fn options(&self) -> &RegressionOptions {
        &self.options
    }
}

impl Regressor for OlsRegressor {
    type Fitted = FittedOls;

    fn fit(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<Self::Fitted, RegressionError> {
        self.options.validate()?;
        check_rows(x, y)?;

        let n_samples = x.nrows();
        if n_samples == 0 {
            return Err(RegressionError::InsufficientObservations { needed: 1, got: 0 });
        }
        check_columns(x, self.options.with_intercept)?;

        let x_prepared = augment(x, self.options.with_intercept);

        let result = match self.options.solver {
            SolverType::NormalEquations => self.fit_closed_form(&x_prepared, y)?,
            SolverType::GradientDescent => self.fit_gradient_descent(&x_prepared, y)?,
        };

        Ok(FittedOls {
            options: self.options.clone(),
            result,
        })
    }
}

impl OlsRegressor {
    /// Solve the normal equations on a prepared design matrix.
    fn fit_closed_form(
        &self,
        x_prepared: &Mat<f64>,
        y: &Col<f64>,
    ) -> Result<RegressionResult, RegressionError> {
        let xtx = gram_matrix(x_prepared, 0.0, false);
        let xty = x_prepared.transpose() * y;

        let solution = solve_normal_equations(&xtx, &xty, self.options.condition_threshold)?;
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

    /// Minimize the MSE by gradient descent on a prepared design matrix.
    fn fit_gradient_descent(
        &self,
        x_prepared: &Mat<f64>,
        y: &Col<f64>,
    ) -> Result<RegressionResult, RegressionError> {
        let outcome = GradientDescent::from_options(&self.options).minimize(x_prepared, y)?;

        let mut diagnostics = Vec::new();
        if !outcome.converged {
            log::warn!(
                "gradient descent stopped at max_iterations={} (last step {:.3e})",
                outcome.iterations,
                outcome.last_step
            );
            diagnostics.push(Diagnostic::NotConverged {
                iterations: outcome.iterations,
                last_step: outcome.last_step,
            });
        }

        let fitted_values = x_prepared * &outcome.beta;
        let mut result = RegressionResult::from_fit(
            outcome.beta,
            self.options.with_intercept,
            y,
            fitted_values,
            SolverReport::GradientDescent {
                iterations: outcome.iterations,
                converged: outcome.converged,
            },
        );
        result.diagnostics = diagnostics;
        Ok(result)
    }
}

/// A fitted OLS regression model.
#[derive(Debug, Clone)]
pub struct FittedOls {
    options: RegressionOptions,
    result: RegressionResult,
}

impl FittedOls {
    /// Get the options used to fit this model.
    pub fn options(&self) -> &RegressionOptions {
        &self.options
    }

    /// Prepare new data with the intercept policy of the fit.
    fn prepare(&self, x: &Mat<f64>) -> Result<Mat<f64>, RegressionError> {
        check_features(x, self.result.n_features())?;
        Ok(augment(x, self.options.with_intercept))
    }
}

impl FittedRegressor for FittedOls {
    fn predict(&self, x: &Mat<f64>) -> Result<Col<f64>, RegressionError> {
        let x_prepared = self.prepare(x)?;
        Ok(&x_prepared * &self.result.beta)
    }

    /// σ̂²(XᵗX)⁻¹ with σ̂² = eᵗe / (n − p) on the given data.
    fn estimate_variance(
        &self,
        x: &Mat<f64>,
        y: &Col<f64>,
    ) -> Result<Diagnosed<Mat<f64>>, RegressionError> {
        check_rows(x, y)?;
        let x_prepared = self.prepare(x)?;
        ols_covariance(
            &x_prepared,
            y,
            &self.result.beta,
            self.options.condition_threshold,
        )
    }

    fn result(&self) -> &RegressionResult {
        &self.result
    }
}

/// Builder for `OlsRegressor`.
#[derive(Debug, Clone, Default)]
pub struct OlsRegressorBuilder {
    builder: RegressionOptionsBuilder,
}

impl OlsRegressorBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to include an intercept term.
    pub fn with_intercept(mut self, include: bool) -> Self {
        self.builder = self.builder.with_intercept(include);
        self
    }

    /// Use gradient descent instead of the closed-form solve.
    pub fn gradient_descent(mut self, enabled: bool) -> Self {
        let solver = if enabled {
            SolverType::GradientDescent
        } else {
            SolverType::NormalEquations
        };
        self.builder = self.builder.solver(solver);
        self
    }

    /// Set the maximum number of gradient descent iterations.
    pub fn max_iterations(mut self, max_iter: usize) -> Self {
        self.builder = self.builder.max_iterations(max_iter);
        self
    }

    /// Set the gradient descent step size.
    pub fn learning_rate(mut self, rate: f64) -> Self {
        self.builder = self.builder.learning_rate(rate);
        self
    }

    /// Set the convergence tolerance on the coefficient update norm.
    pub fn tolerance(mut self, tol: f64) -> Self {
        self.builder = self.builder.tolerance(tol);
        self
    }

    /// Set the condition number threshold for ill-conditioning diagnostics.
    pub fn condition_threshold(mut self, threshold: f64) -> Self {
        self.builder = self.builder.condition_threshold(threshold);
        self
    }

    /// Build the OLS regressor. Options are validated when fitting.
    pub fn build(self) -> OlsRegressor {
        OlsRegressor::new(self.builder.build_unchecked())
    }
}
