//! Whitening transform for correlated errors.
//!
//! For an error covariance Σ = LLᵗ, premultiplying the model by L⁻¹ gives
//! errors with identity covariance, so ordinary least squares on
//! (L⁻¹X, L⁻¹y) is generalized least squares on (X, y).

use crate::solvers::RegressionError;
use faer::linalg::triangular_solve::solve_lower_triangular_in_place;
use faer::{Col, Mat, Par, Side};

/// Relative asymmetry of Σ tolerated before it is rejected.
const SYMMETRY_TOLERANCE: f64 = 1e-10;

/// Cholesky-based whitening operator for an error covariance matrix.
#[derive(Debug, Clone)]
pub(crate) struct Whitener {
    /// Lower Cholesky factor of Σ.
    lower: Mat<f64>,
}

impl Whitener {
    /// Factor Σ.
    ///
    /// Fails with `InvalidInput` when Σ is not symmetric and with
    /// `SingularMatrix` when it is not positive definite.
    pub(crate) fn new(sigma: &Mat<f64>) -> Result<Self, RegressionError> {
        check_symmetric(sigma)?;
        let llt = sigma
            .as_ref()
            .llt(Side::Lower)
            .map_err(|_| RegressionError::SingularMatrix)?;
        Ok(Self {
            lower: llt.L().to_owned(),
        })
    }

    pub(crate) fn dimension(&self) -> usize {
        self.lower.nrows()
    }

    /// L⁻¹ · X.
    pub(crate) fn whiten_matrix(&self, x: &Mat<f64>) -> Mat<f64> {
        let mut z = x.clone();
        solve_lower_triangular_in_place(self.lower.as_ref(), z.as_mut(), Par::Seq);
        z
    }

    /// L⁻¹ · y.
    pub(crate) fn whiten_vector(&self, y: &Col<f64>) -> Col<f64> {
        let mut z = y.clone();
        solve_lower_triangular_in_place(self.lower.as_ref(), z.as_mat_mut(), Par::Seq);
        z
    }
}

/// Reject Σ whose upper and lower triangles disagree beyond rounding.
fn check_symmetric(sigma: &Mat<f64>) -> Result<(), RegressionError> {
    let n = sigma.nrows();
    let scale = sigma
        .col_iter()
        .flat_map(|c| c.iter().copied())
        .fold(0.0_f64, |m, v| m.max(v.abs()));
    let tol = SYMMETRY_TOLERANCE * scale;

    for j in 0..n {
        for i in (j + 1)..n {
            if (sigma[(i, j)] - sigma[(j, i)]).abs() > tol {
                return Err(RegressionError::InvalidInput(format!(
                    "sigma is not symmetric: sigma[({i}, {j})] = {} but sigma[({j}, {i})] = {}",
                    sigma[(i, j)],
                    sigma[(j, i)]
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ar1_covariance(n: usize, rho: f64) -> Mat<f64> {
        Mat::from_fn(n, n, |i, j| rho.powi((i as i32 - j as i32).abs()))
    }

    #[test]
    fn test_identity_whitening_is_exact() {
        let sigma = Mat::<f64>::identity(4, 4);
        let whitener = Whitener::new(&sigma).unwrap();
        let x = Mat::from_fn(4, 2, |i, j| (i as f64 + 0.3) * (j as f64 - 1.7));
        let y = Col::from_fn(4, |i| i as f64 * 0.1 - 2.0);

        assert_eq!(whitener.whiten_matrix(&x), x);
        assert_eq!(whitener.whiten_vector(&y), y);
    }

    #[test]
    fn test_whitened_covariance_is_identity() {
        // L⁻¹ Σ L⁻ᵗ = I, i.e. whitening the columns of Σ gives L⁻¹Σ = Lᵗ.
        let sigma = ar1_covariance(5, 0.6);
        let whitener = Whitener::new(&sigma).unwrap();
        let z = whitener.whiten_matrix(&sigma);
        let zt = z.transpose().to_owned();
        let back = whitener.whiten_matrix(&zt);
        for i in 0..5 {
            for j in 0..5 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((back[(i, j)] - expected).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_asymmetric_sigma_rejected() {
        let mut sigma = ar1_covariance(3, 0.5);
        sigma[(0, 2)] = 0.9;
        assert!(matches!(
            Whitener::new(&sigma),
            Err(RegressionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_whitened_vector_solves_lower_system() {
        let sigma = ar1_covariance(4, 0.3);
        let whitener = Whitener::new(&sigma).unwrap();
        let y = Col::from_fn(4, |i| 1.0 + i as f64);
        let z = whitener.whiten_vector(&y);

        // L z = y
        let l = &whitener.lower;
        for i in 0..4 {
            let lz: f64 = (0..=i).map(|k| l[(i, k)] * z[k]).sum();
            assert!((lz - y[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_not_positive_definite() {
        let sigma = Mat::from_fn(2, 2, |i, j| if i == j { 1.0 } else { 2.0 });
        assert!(matches!(
            Whitener::new(&sigma),
            Err(RegressionError::SingularMatrix)
        ));
    }
}
