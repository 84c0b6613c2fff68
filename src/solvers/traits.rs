//! Core traits for regression estimators.

use crate::core::{r_squared_from, Diagnosed, RegressionResult};
use faer::{Col, Mat};
use thiserror::Error;

/// Errors that can occur during regression fitting.
#[derive(Debug, Error)]
pub enum RegressionError {
    #[error("dimension mismatch: X has {x_rows} rows but y has {y_len} elements")]
    DimensionMismatch { x_rows: usize, y_len: usize },

    #[error("sigma must be {expected}x{expected}, got {rows}x{cols}")]
    SigmaDimensionMismatch {
        expected: usize,
        rows: usize,
        cols: usize,
    },

    #[error("feature mismatch: model was fit on {expected} features, X has {got}")]
    FeatureMismatch { expected: usize, got: usize },

    #[error("insufficient observations: need at least {needed}, got {got}")]
    InsufficientObservations { needed: usize, got: usize },

    #[error("matrix is singular or not positive definite")]
    SingularMatrix,

    #[error("model has not been fitted")]
    NotFitted,

    #[error("invalid options: {0}")]
    InvalidOptions(#[from] crate::core::OptionsError),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("numerical error: {0}")]
    NumericalError(String),
}

/// A regression estimator that can be fit to data.
///
/// Fitting consumes nothing: the configured estimator stays reusable and each
/// call produces a new fitted model that owns its coefficients.
pub trait Regressor {
    /// The type of the fitted model.
    type Fitted: FittedRegressor;

    /// Fit the model to the data.
    ///
    /// # Arguments
    /// * `x` - Design matrix of shape (n_samples, n_features)
    /// * `y` - Target vector of length n_samples
    fn fit(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<Self::Fitted, RegressionError>;
}

/// A fitted regression model that can make predictions.
pub trait FittedRegressor {
    /// Predict `X_prepared · β` for new data with the fit's intercept policy.
    fn predict(&self, x: &Mat<f64>) -> Result<Col<f64>, RegressionError>;

    /// Estimate the variance-covariance matrix of β on the given data.
    ///
    /// The returned matrix is `p × p` over the prepared design (intercept first).
    fn estimate_variance(
        &self,
        x: &Mat<f64>,
        y: &Col<f64>,
    ) -> Result<Diagnosed<Mat<f64>>, RegressionError>;

    /// Access the regression results (coefficients, statistics, etc.).
    fn result(&self) -> &RegressionResult;

    /// Full coefficient vector β, intercept first when present.
    fn beta(&self) -> &Col<f64> {
        &self.result().beta
    }

    /// Get the coefficients (convenience method).
    fn coefficients(&self) -> &Col<f64> {
        &self.result().coefficients
    }

    /// Get the intercept (convenience method).
    fn intercept(&self) -> Option<f64> {
        self.result().intercept
    }

    /// Get R² (convenience method).
    fn r_squared(&self) -> f64 {
        self.result().r_squared
    }

    /// Calculate the score (R²) on new data.
    fn score(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<f64, RegressionError> {
        check_rows(x, y)?;
        let predictions = self.predict(x)?;
        let rss: f64 = y
            .iter()
            .zip(predictions.iter())
            .map(|(&yi, &pi)| (yi - pi).powi(2))
            .sum();
        Ok(r_squared_from(y, rss))
    }
}

/// Fail fast when X and y disagree on the number of observations.
pub(crate) fn check_rows(x: &Mat<f64>, y: &Col<f64>) -> Result<(), RegressionError> {
    if x.nrows() != y.nrows() {
        return Err(RegressionError::DimensionMismatch {
            x_rows: x.nrows(),
            y_len: y.nrows(),
        });
    }
    Ok(())
}

/// Reject a design with no columns at all, which leaves nothing to estimate.
pub(crate) fn check_columns(x: &Mat<f64>, with_intercept: bool) -> Result<(), RegressionError> {
    if x.ncols() == 0 && !with_intercept {
        return Err(RegressionError::InvalidInput(
            "design matrix has no columns and no intercept".to_string(),
        ));
    }
    Ok(())
}

/// Fail fast when X does not have the number of features the model was fit on.
pub(crate) fn check_features(x: &Mat<f64>, expected: usize) -> Result<(), RegressionError> {
    if x.ncols() != expected {
        return Err(RegressionError::FeatureMismatch {
            expected,
            got: x.ncols(),
        });
    }
    Ok(())
}
