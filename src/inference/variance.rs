//! Variance-covariance estimators for fitted coefficients.
//!
//! Every estimator takes the *prepared* design matrix (intercept column
//! included) and returns a `p × p` matrix over β in the same order.

use crate::core::{Diagnosed, Diagnostic};
use crate::linalg::{gram_matrix, invert_symmetric, symmetrize};
use crate::solvers::RegressionError;
use faer::{Col, Mat};

/// Residual sum of squares of `y − Xβ`.
fn residual_sum_of_squares(x: &Mat<f64>, y: &Col<f64>, beta: &Col<f64>) -> f64 {
    let fitted = x * beta;
    y.iter()
        .zip(fitted.iter())
        .map(|(&yi, &fi)| (yi - fi).powi(2))
        .sum()
}

fn scaled(a: &Mat<f64>, factor: f64) -> Mat<f64> {
    Mat::from_fn(a.nrows(), a.ncols(), |i, j| factor * a[(i, j)])
}

/// OLS covariance σ̂²(XᵗX)⁻¹ with σ̂² = eᵗe / (n − p).
///
/// A singular XᵗX is inverted with the pseudo-inverse and flagged.
pub fn ols_covariance(
    x: &Mat<f64>,
    y: &Col<f64>,
    beta: &Col<f64>,
    condition_threshold: f64,
) -> Result<Diagnosed<Mat<f64>>, RegressionError> {
    let n = x.nrows();
    let p = x.ncols();
    if n <= p {
        return Err(RegressionError::InsufficientObservations {
            needed: p + 1,
            got: n,
        });
    }

    let sigma2 = residual_sum_of_squares(x, y, beta) / (n - p) as f64;
    let xtx_inv = invert_symmetric(&gram_matrix(x, 0.0, false), condition_threshold)?;

    Ok(xtx_inv.into_diagnosed().map(|inv| scaled(&inv, sigma2)))
}

/// Ridge sandwich covariance σ̂² A⁻¹XᵗXA⁻¹ with A = XᵗX + αD.
///
/// D is the identity, with a zero in the intercept position when
/// `skip_intercept` is set. σ̂² = eᵗe / (n − tr(H)) where H = XA⁻¹Xᵗ is the
/// ridge hat matrix, so the estimate stays finite when p exceeds n. The
/// result always carries [`Diagnostic::HomoskedasticityAssumed`].
pub fn ridge_covariance(
    x: &Mat<f64>,
    y: &Col<f64>,
    beta: &Col<f64>,
    penalty: f64,
    skip_intercept: bool,
    condition_threshold: f64,
) -> Result<Diagnosed<Mat<f64>>, RegressionError> {
    let n = x.nrows();
    let xtx = gram_matrix(x, 0.0, false);
    let a = gram_matrix(x, penalty, skip_intercept);
    let a_inv = invert_symmetric(&a, condition_threshold)?;

    // tr(H) = tr(A⁻¹XᵗX)
    let a_inv_xtx = &a_inv.value * &xtx;
    let effective_df: f64 = (0..a_inv_xtx.nrows()).map(|i| a_inv_xtx[(i, i)]).sum();
    let residual_df = n as f64 - effective_df;
    if !(residual_df > 0.0) {
        return Err(RegressionError::InsufficientObservations {
            needed: effective_df.ceil() as usize + 1,
            got: n,
        });
    }

    let sigma2 = residual_sum_of_squares(x, y, beta) / residual_df;
    let mut sandwich = scaled(&(&a_inv_xtx * &a_inv.value), sigma2);
    symmetrize(&mut sandwich);

    log::warn!("ridge variance estimate assumes homoskedastic errors");
    let mut diagnostics = a_inv.diagnostics;
    diagnostics.push(Diagnostic::HomoskedasticityAssumed);

    Ok(Diagnosed::new(sandwich, diagnostics))
}

/// GLS covariance (XᵗΣ⁻¹X)⁻¹ computed from the whitened design L⁻¹X.
pub fn gls_covariance(
    x_whitened: &Mat<f64>,
    condition_threshold: f64,
) -> Result<Diagnosed<Mat<f64>>, RegressionError> {
    let xt_sigma_inv_x = gram_matrix(x_whitened, 0.0, false);
    Ok(invert_symmetric(&xt_sigma_inv_x, condition_threshold)?.into_diagnosed())
}
