//! Core types for regression analysis.

mod diagnostic;
mod options;
mod result;

pub use diagnostic::{Diagnosed, Diagnostic};
pub use options::{
    OptionsError, PenaltyScaling, RegressionOptions, RegressionOptionsBuilder, SolverType,
    DEFAULT_CONDITION_THRESHOLD,
};
pub use result::{RegressionResult, SolverReport};
pub(crate) use result::r_squared_from;
