//! Regression options and configuration.

use thiserror::Error;

/// Condition number of the normal matrix above which a fit is flagged as ill-conditioned.
pub const DEFAULT_CONDITION_THRESHOLD: f64 = 1e10;

/// How the OLS coefficients are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolverType {
    /// Closed-form solve of the normal equations (default).
    #[default]
    NormalEquations,
    /// Batch gradient descent on the mean squared error.
    GradientDescent,
}

/// Penalty scaling convention for ridge regression.
///
/// Different software packages use different conventions for the regularization
/// parameter. This enum allows matching the behavior of various implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PenaltyScaling {
    /// Use alpha as-is (default).
    ///
    /// Minimizes: ||y - Xβ||² + α||β||²
    #[default]
    Raw,

    /// Scale alpha by the number of observations, as R's glmnet does.
    ///
    /// Minimizes: ||y - Xβ||² + n·α||β||²
    Glmnet,
}

/// Configuration options for regression models.
#[derive(Debug, Clone)]
pub struct RegressionOptions {
    /// Whether to include an intercept term (default: true).
    pub with_intercept: bool,
    /// L2 penalty strength for ridge regression (default: 0).
    pub alpha: f64,
    /// Penalty scaling convention (default: Raw).
    pub penalty_scaling: PenaltyScaling,
    /// Solver used by OLS.
    pub solver: SolverType,
    /// Maximum iterations for gradient descent.
    pub max_iterations: usize,
    /// Step size for gradient descent.
    pub learning_rate: f64,
    /// Convergence tolerance on the L2 norm of the coefficient update.
    pub tolerance: f64,
    /// Condition number above which an ill-conditioning diagnostic is raised.
    pub condition_threshold: f64,
}

impl Default for RegressionOptions {
    fn default() -> Self {
        Self {
            with_intercept: true,
            alpha: 0.0,
            penalty_scaling: PenaltyScaling::Raw,
            solver: SolverType::NormalEquations,
            max_iterations: 1000,
            learning_rate: 0.01,
            tolerance: 1e-6,
            condition_threshold: DEFAULT_CONDITION_THRESHOLD,
        }
    }
}

/// Errors that can occur when validating regression options.
#[derive(Debug, Error, PartialEq)]
pub enum OptionsError {
    #[error("alpha must be non-negative and finite, got {0}")]
    InvalidAlpha(f64),
    #[error("learning_rate must be positive and finite, got {0}")]
    InvalidLearningRate(f64),
    #[error("tolerance must be positive, got {0}")]
    InvalidTolerance(f64),
    #[error("max_iterations must be at least 1, got {0}")]
    InvalidMaxIterations(usize),
    #[error("condition_threshold must be greater than 1, got {0}")]
    InvalidConditionThreshold(f64),
}

impl RegressionOptions {
    /// Create a new builder for regression options.
    pub fn builder() -> RegressionOptionsBuilder {
        RegressionOptionsBuilder::default()
    }

    /// Create default options for OLS regression.
    pub fn ols() -> Self {
        Self::default()
    }

    /// Create options for OLS fitted by gradient descent.
    pub fn gradient_descent(learning_rate: f64, max_iterations: usize, tolerance: f64) -> Self {
        Self {
            solver: SolverType::GradientDescent,
            learning_rate,
            max_iterations,
            tolerance,
            ..Default::default()
        }
    }

    /// Create options for Ridge regression with the given penalty.
    pub fn ridge(alpha: f64) -> Self {
        Self {
            alpha,
            ..Default::default()
        }
    }

    /// Penalty actually added to the diagonal for `n_samples` observations.
    pub fn effective_alpha(&self, n_samples: usize) -> f64 {
        match self.penalty_scaling {
            PenaltyScaling::Raw => self.alpha,
            PenaltyScaling::Glmnet => self.alpha * n_samples as f64,
        }
    }

    /// Validate the options and return an error if invalid.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !(self.alpha >= 0.0 && self.alpha.is_finite()) {
            return Err(OptionsError::InvalidAlpha(self.alpha));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(OptionsError::InvalidLearningRate(self.learning_rate));
        }
        if !(self.tolerance > 0.0) {
            return Err(OptionsError::InvalidTolerance(self.tolerance));
        }
        if self.max_iterations < 1 {
            return Err(OptionsError::InvalidMaxIterations(self.max_iterations));
        }
        if !(self.condition_threshold > 1.0) {
            return Err(OptionsError::InvalidConditionThreshold(
                self.condition_threshold,
            ));
        }
        Ok(())
    }
}

/// Builder for `RegressionOptions`.
#[derive(Debug, Clone, Default)]
pub struct RegressionOptionsBuilder {
    options: RegressionOptions,
}

impl RegressionOptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to include an intercept term.
    pub fn with_intercept(mut self, include: bool) -> Self {
        self.options.with_intercept = include;
        self
    }

    /// Set the ridge penalty.
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.options.alpha = alpha;
        self
    }

    /// Set the penalty scaling convention.
    ///
    /// Use `PenaltyScaling::Glmnet` to match R's glmnet package behavior.
    pub fn penalty_scaling(mut self, scaling: PenaltyScaling) -> Self {
        self.options.penalty_scaling = scaling;
        self
    }

    /// Set the solver type.
    pub fn solver(mut self, solver: SolverType) -> Self {
        self.options.solver = solver;
        self
    }

    /// Set the maximum iterations for gradient descent.
    pub fn max_iterations(mut self, max_iter: usize) -> Self {
        self.options.max_iterations = max_iter;
        self
    }

    /// Set the gradient descent step size.
    pub fn learning_rate(mut self, rate: f64) -> Self {
        self.options.learning_rate = rate;
        self
    }

    /// Set the convergence tolerance.
    pub fn tolerance(mut self, tol: f64) -> Self {
        self.options.tolerance = tol;
        self
    }

    /// Set the condition number threshold for ill-conditioning diagnostics.
    pub fn condition_threshold(mut self, threshold: f64) -> Self {
        self.options.condition_threshold = threshold;
        self
    }

    /// Build and validate the options.
    pub fn build(self) -> Result<RegressionOptions, OptionsError> {
        self.options.validate()?;
        Ok(self.options)
    }

    /// Build the options without validation.
    pub fn build_unchecked(self) -> RegressionOptions {
        self.options
    }
}
