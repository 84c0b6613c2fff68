//! Regression solvers implementing the OLS, GLS and Ridge estimators.

mod traits;
mod gradient_descent;
mod ols;
mod gls;
mod ridge;
mod model;

pub use traits::{FittedRegressor, Regressor, RegressionError};
pub use gradient_descent::{GradientDescent, GradientDescentOutcome};
pub use ols::{FittedOls, OlsRegressor, OlsRegressorBuilder};
pub use gls::{FittedGls, GlsRegressor, GlsRegressorBuilder};
pub use ridge::{FittedRidge, RidgeRegressor, RidgeRegressorBuilder};
pub use model::{Model, ModelState};
