//! Mutable estimator handle with an explicit Unfit / Fitted state.

use crate::core::Diagnosed;
use crate::solvers::traits::{FittedRegressor, RegressionError, Regressor};
use faer::{Col, Mat};
use std::fmt;

/// Fit state of a [`Model`].
#[derive(Debug, Clone)]
pub enum ModelState<F> {
    Unfit,
    Fitted(F),
}

/// An estimator together with its current fit.
///
/// `fit` replaces the state on success and leaves it untouched on error.
/// Methods that need coefficients return [`RegressionError::NotFitted`]
/// while the model is unfit.
///
/// ```rust,ignore
/// let mut model = Model::new(OlsRegressor::builder().build());
/// assert!(matches!(model.predict(&x), Err(RegressionError::NotFitted)));
/// model.fit(&x, &y)?;
/// let y_hat = model.predict(&x)?;
/// ```
pub struct Model<R: Regressor> {
    regressor: R,
    state: ModelState<R::Fitted>,
}

impl<R> Clone for Model<R>
where
    R: Regressor + Clone,
    R::Fitted: Clone,
{
    fn clone(&self) -> Self {
        Self {
            regressor: self.regressor.clone(),
            state: self.state.clone(),
        }
    }
}

impl<R> fmt::Debug for Model<R>
where
    R: Regressor + fmt::Debug,
    R::Fitted: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("regressor", &self.regressor)
            .field("state", &self.state)
            .finish()
    }
}

impl<R: Regressor> Model<R> {
    pub fn new(regressor: R) -> Self {
        Self {
            regressor,
            state: ModelState::Unfit,
        }
    }

    pub fn regressor(&self) -> &R {
        &self.regressor
    }

    pub fn state(&self) -> &ModelState<R::Fitted> {
        &self.state
    }

    pub fn is_fitted(&self) -> bool {
        matches!(self.state, ModelState::Fitted(_))
    }

    /// Fit (or re-fit) the model, overwriting any previous coefficients.
    pub fn fit(&mut self, x: &Mat<f64>, y: &Col<f64>) -> Result<&R::Fitted, RegressionError> {
        let fitted = self.regressor.fit(x, y)?;
        self.state = ModelState::Fitted(fitted);
        self.fitted()
    }

    /// The fitted model, or `NotFitted`.
    pub fn fitted(&self) -> Result<&R::Fitted, RegressionError> {
        match &self.state {
            ModelState::Fitted(fitted) => Ok(fitted),
            ModelState::Unfit => Err(RegressionError::NotFitted),
        }
    }

    /// Consume the model and return its fit.
    pub fn into_fitted(self) -> Result<R::Fitted, RegressionError> {
        match self.state {
            ModelState::Fitted(fitted) => Ok(fitted),
            ModelState::Unfit => Err(RegressionError::NotFitted),
        }
    }

    /// Forget the current fit.
    pub fn reset(&mut self) {
        self.state = ModelState::Unfit;
    }

    pub fn beta(&self) -> Result<&Col<f64>, RegressionError> {
        Ok(self.fitted()?.beta())
    }

    pub fn predict(&self, x: &Mat<f64>) -> Result<Col<f64>, RegressionError> {
        self.fitted()?.predict(x)
    }

    pub fn estimate_variance(
        &self,
        x: &Mat<f64>,
        y: &Col<f64>,
    ) -> Result<Diagnosed<Mat<f64>>, RegressionError> {
        self.fitted()?.estimate_variance(x, y)
    }
}
