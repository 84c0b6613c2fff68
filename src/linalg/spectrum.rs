//! Eigen-spectrum of symmetric normal matrices.

use crate::solvers::RegressionError;
use faer::{Mat, Side};

/// Eigendecomposition of a symmetric positive semi-definite matrix.
#[derive(Debug, Clone)]
pub(crate) struct SymmetricSpectrum {
    values: Vec<f64>,
    vectors: Mat<f64>,
}

impl SymmetricSpectrum {
    pub(crate) fn new(matrix: &Mat<f64>) -> Result<Self, RegressionError> {
        let eig = matrix
            .as_ref()
            .self_adjoint_eigen(Side::Lower)
            .map_err(|e| {
                RegressionError::NumericalError(format!("eigendecomposition failed: {:?}", e))
            })?;

        let s = eig.S().column_vector();
        let values = (0..s.nrows()).map(|i| s[i]).collect();
        let vectors = eig.U().to_owned();

        Ok(Self { values, vectors })
    }

    pub(crate) fn dimension(&self) -> usize {
        self.values.len()
    }

    fn max_value(&self) -> f64 {
        self.values.iter().fold(0.0_f64, |m, &v| m.max(v.abs()))
    }

    /// Eigenvalues at or below this are treated as zero.
    pub(crate) fn tolerance(&self) -> f64 {
        self.max_value() * self.dimension().max(1) as f64 * f64::EPSILON
    }

    /// Number of eigenvalues above the tolerance.
    pub(crate) fn rank(&self) -> usize {
        let tol = self.tolerance();
        self.values.iter().filter(|&&v| v > tol).count()
    }

    pub(crate) fn is_singular(&self) -> bool {
        self.max_value() == 0.0 || self.rank() < self.dimension()
    }

    /// λ_max / λ_min, infinite when the matrix is singular.
    pub(crate) fn condition_number(&self) -> f64 {
        if self.dimension() == 0 {
            return 1.0;
        }
        if self.is_singular() {
            return f64::INFINITY;
        }
        let min = self.values.iter().fold(f64::INFINITY, |m, &v| m.min(v));
        self.max_value() / min
    }

    /// Moore-Penrose pseudo-inverse: Σ_{λ > tol} u uᵗ / λ.
    pub(crate) fn pseudo_inverse(&self) -> Mat<f64> {
        let p = self.dimension();
        let tol = self.tolerance();
        let u = &self.vectors;

        let kept: Vec<(usize, f64)> = self
            .values
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v > tol)
            .map(|(k, &v)| (k, 1.0 / v))
            .collect();

        let mut inv = Mat::from_fn(p, p, |i, j| {
            kept.iter()
                .map(|&(k, inv_lambda)| u[(i, k)] * u[(j, k)] * inv_lambda)
                .sum()
        });
        symmetrize(&mut inv);
        inv
    }
}

/// Replace a matrix by (A + Aᵗ)/2 in place.
pub(crate) fn symmetrize(a: &mut Mat<f64>) {
    let p = a.nrows();
    for i in 0..p {
        for j in (i + 1)..p {
            let avg = 0.5 * (a[(i, j)] + a[(j, i)]);
            a[(i, j)] = avg;
            a[(j, i)] = avg;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_number_diagonal() {
        let a = Mat::from_fn(3, 3, |i, j| if i == j { (i + 1) as f64 } else { 0.0 });
        let spectrum = SymmetricSpectrum::new(&a).unwrap();
        assert!((spectrum.condition_number() - 3.0).abs() < 1e-10);
        assert_eq!(spectrum.rank(), 3);
        assert!(!spectrum.is_singular());
    }

    #[test]
    fn test_singular_matrix() {
        // Rank-one matrix v vᵗ
        let a = Mat::from_fn(3, 3, |i, j| ((i + 1) * (j + 1)) as f64);
        let spectrum = SymmetricSpectrum::new(&a).unwrap();
        assert!(spectrum.is_singular());
        assert_eq!(spectrum.rank(), 1);
        assert!(spectrum.condition_number().is_infinite());
    }

    #[test]
    fn test_pseudo_inverse_of_invertible_is_inverse() {
        let a = Mat::from_fn(2, 2, |i, j| if i == j { 2.0 } else { 1.0 });
        let inv = SymmetricSpectrum::new(&a).unwrap().pseudo_inverse();
        let product = &a * &inv;
        for i in 0..2 {
            for j in 0..2 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((product[(i, j)] - expected).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_pseudo_inverse_penrose_identity() {
        let a = Mat::from_fn(3, 3, |i, j| ((i + 1) * (j + 1)) as f64);
        let pinv = SymmetricSpectrum::new(&a).unwrap().pseudo_inverse();
        // A A⁺ A = A
        let reconstructed = &(&a * &pinv) * &a;
        for i in 0..3 {
            for j in 0..3 {
                assert!((reconstructed[(i, j)] - a[(i, j)]).abs() < 1e-8);
            }
        }
    }
}
