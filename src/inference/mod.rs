//! Statistical inference: coefficient covariance, standard errors, p-values and summaries.

mod coefficient;
mod summary;
mod variance;

pub use coefficient::CoefficientInference;
pub use summary::{summary, summary_with_level, FitSummary};
pub use variance::{gls_covariance, ols_covariance, ridge_covariance};
