//! Batch gradient descent on the mean squared error.

use crate::core::RegressionOptions;
use crate::solvers::traits::{check_rows, RegressionError};
use crate::utils::l2_norm;
use faer::{Col, Mat};

/// Gradient descent minimizer of `L(β) = (1/n)‖y − Xβ‖²`.
///
/// Each step applies `β ← β − η∇L(β)` with `∇L(β) = −(2/n)Xᵗ(y − Xβ)`,
/// starting from β = 0. Iteration stops when the L2 norm of the update drops
/// below `tolerance` or after `max_iterations` steps. Convergence for a given
/// learning rate is not checked beyond the stopping rule.
#[derive(Debug, Clone, Copy)]
pub struct GradientDescent {
    pub learning_rate: f64,
    pub max_iterations: usize,
    pub tolerance: f64,
}

/// Result of a gradient descent run.
#[derive(Debug, Clone)]
pub struct GradientDescentOutcome {
    pub beta: Col<f64>,
    /// Number of updates applied.
    pub iterations: usize,
    pub converged: bool,
    /// L2 norm of the final update.
    pub last_step: f64,
}

impl Default for GradientDescent {
    fn default() -> Self {
        Self::from_options(&RegressionOptions::default())
    }
}

impl GradientDescent {
    pub fn new(learning_rate: f64, max_iterations: usize, tolerance: f64) -> Self {
        Self {
            learning_rate,
            max_iterations,
            tolerance,
        }
    }

    pub fn from_options(options: &RegressionOptions) -> Self {
        Self::new(
            options.learning_rate,
            options.max_iterations,
            options.tolerance,
        )
    }

    /// Minimize the MSE over an already prepared design matrix.
    pub fn minimize(
        &self,
        x: &Mat<f64>,
        y: &Col<f64>,
    ) -> Result<GradientDescentOutcome, RegressionError> {
        check_rows(x, y)?;
        let n_samples = x.nrows();
        let n_params = x.ncols();

        if n_samples == 0 {
            return Err(RegressionError::InsufficientObservations { needed: 1, got: 0 });
        }

        let scale = 2.0 / n_samples as f64;
        let mut beta = Col::zeros(n_params);
        let mut last_step = f64::INFINITY;

        for iteration in 1..=self.max_iterations {
            let predictions = x * &beta;
            let residuals = Col::from_fn(n_samples, |i| y[i] - predictions[i]);
            // -∇L = (2/n) Xᵗ(y − Xβ)
            let descent = x.transpose() * &residuals;

            let step = Col::from_fn(n_params, |j| self.learning_rate * scale * descent[j]);
            for j in 0..n_params {
                beta[j] += step[j];
            }

            last_step = l2_norm(&step);
            if !last_step.is_finite() {
                return Err(RegressionError::NumericalError(format!(
                    "gradient descent diverged at iteration {} (learning rate {})",
                    iteration, self.learning_rate
                )));
            }

            if last_step < self.tolerance {
                log::debug!(
                    "gradient descent converged after {} iterations (step {:.3e})",
                    iteration,
                    last_step
                );
                return Ok(GradientDescentOutcome {
                    beta,
                    iterations: iteration,
                    converged: true,
                    last_step,
                });
            }
        }

        Ok(GradientDescentOutcome {
            beta,
            iterations: self.max_iterations,
            converged: false,
            last_step,
        })
    }
}
