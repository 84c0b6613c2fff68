//! Linear regression estimators with variance estimates and fit summaries.
//!
//! The crate provides three estimator families over dense `faer` matrices:
//! Ordinary Least Squares (closed form or gradient descent), Generalized
//! Least Squares with a user supplied error covariance, and Ridge regression
//! with an unpenalized intercept. Numerical trouble (ill-conditioning,
//! pseudo-inverse fallback) is reported as [`Diagnostic`] values and mirrored
//! to the `log` facade; it never aborts a fit.
//!
//! # Example
//!
//! ```rust,ignore
//! use linfit::prelude::*;
//!
//! let fitted = OlsRegressor::builder()
//!     .with_intercept(true)
//!     .build()
//!     .fit(&x, &y)?;
//!
//! let predictions = fitted.predict(&x_new)?;
//! let covariance = fitted.estimate_variance(&x, &y)?;
//! if covariance.is_ill_conditioned() {
//!     // consider RidgeRegressor
//! }
//!
//! let report = summary(&fitted, &x, &y)?;
//! println!("{}", report);
//! ```

pub mod core;
pub mod inference;
mod linalg;
pub mod solvers;
pub mod utils;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::{
        Diagnosed, Diagnostic, PenaltyScaling, RegressionOptions, RegressionOptionsBuilder,
        RegressionResult, SolverType,
    };
    pub use crate::inference::{summary, summary_with_level, FitSummary};
    pub use crate::solvers::{
        FittedGls, FittedOls, FittedRegressor, FittedRidge, GlsRegressor, Model, ModelState,
        OlsRegressor, RegressionError, Regressor, RidgeRegressor,
    };
    pub use crate::utils::{prepare_design_matrix, AsDesignMatrix, LabeledMatrix};
}

pub use crate::core::{Diagnosed, Diagnostic, RegressionOptions, RegressionResult};
pub use crate::inference::{summary, summary_with_level, FitSummary};
pub use crate::solvers::{FittedRegressor, RegressionError, Regressor};
pub use crate::utils::prepare_design_matrix;
