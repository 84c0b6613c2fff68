//! Closed-form solves of (possibly penalized) normal equations.

use super::spectrum::{symmetrize, SymmetricSpectrum};
use crate::core::{Diagnosed, Diagnostic};
use crate::solvers::RegressionError;
use faer::{Col, Mat};

/// Pivots of R smaller than this are treated as zero by the QR solve.
const QR_PIVOT_TOLERANCE: f64 = 1e-14;

/// Solution of a symmetric linear system with its conditioning report.
#[derive(Debug, Clone)]
pub(crate) struct NormalSolution<T> {
    pub value: T,
    pub condition_number: f64,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> NormalSolution<T> {
    pub(crate) fn into_diagnosed(self) -> Diagnosed<T> {
        Diagnosed::new(self.value, self.diagnostics)
    }
}

/// Form XᵗX with `penalty` added to the diagonal, skipping the first column when
/// `skip_first` is set (an unpenalized intercept).
pub(crate) fn gram_matrix(x: &Mat<f64>, penalty: f64, skip_first: bool) -> Mat<f64> {
    let mut xtx = x.transpose() * x;
    if penalty != 0.0 {
        let start = usize::from(skip_first);
        for j in start..xtx.nrows() {
            xtx[(j, j)] += penalty;
        }
    }
    xtx
}

/// Solve `a · β = b` for symmetric positive semi-definite `a`.
///
/// The condition number of `a` is estimated first; above `condition_threshold`
/// an ill-conditioning diagnostic is raised and the solve proceeds. A
/// numerically singular `a` falls back to the pseudo-inverse.
pub(crate) fn solve_normal_equations(
    a: &Mat<f64>,
    b: &Col<f64>,
    condition_threshold: f64,
) -> Result<NormalSolution<Col<f64>>, RegressionError> {
    let spectrum = SymmetricSpectrum::new(a)?;
    let condition_number = spectrum.condition_number();
    let mut diagnostics = conditioning_diagnostics(condition_number, condition_threshold);

    let solved = if spectrum.is_singular() {
        None
    } else {
        qr_solve_vector(a, b)
    };

    let value = match solved {
        Some(beta) => beta,
        None => {
            diagnostics.push(pseudo_inverse_diagnostic(&spectrum));
            &spectrum.pseudo_inverse() * b
        }
    };

    Ok(NormalSolution {
        value,
        condition_number,
        diagnostics,
    })
}

/// Invert a symmetric positive semi-definite matrix under the same
/// conditioning policy as [`solve_normal_equations`].
pub(crate) fn invert_symmetric(
    a: &Mat<f64>,
    condition_threshold: f64,
) -> Result<NormalSolution<Mat<f64>>, RegressionError> {
    let spectrum = SymmetricSpectrum::new(a)?;
    let condition_number = spectrum.condition_number();
    let mut diagnostics = conditioning_diagnostics(condition_number, condition_threshold);

    let inverted = if spectrum.is_singular() {
        None
    } else {
        qr_inverse(a)
    };

    let value = match inverted {
        Some(mut inv) => {
            symmetrize(&mut inv);
            inv
        }
        None => {
            diagnostics.push(pseudo_inverse_diagnostic(&spectrum));
            spectrum.pseudo_inverse()
        }
    };

    Ok(NormalSolution {
        value,
        condition_number,
        diagnostics,
    })
}

fn conditioning_diagnostics(condition_number: f64, threshold: f64) -> Vec<Diagnostic> {
    if condition_number > threshold {
        log::warn!(
            "X'X is ill-conditioned (condition number {:.3e} > {:.1e}); consider regularization",
            condition_number,
            threshold
        );
        vec![Diagnostic::IllConditioned {
            condition_number,
            threshold,
        }]
    } else {
        Vec::new()
    }
}

fn pseudo_inverse_diagnostic(spectrum: &SymmetricSpectrum) -> Diagnostic {
    let rank = spectrum.rank();
    let dimension = spectrum.dimension();
    log::warn!(
        "X'X is singular (rank {} of {}); falling back to the pseudo-inverse",
        rank,
        dimension
    );
    Diagnostic::PseudoInverseFallback { rank, dimension }
}

/// Solve `a · x = b` by QR decomposition and back-substitution.
fn qr_solve_vector(a: &Mat<f64>, b: &Col<f64>) -> Option<Col<f64>> {
    let n = a.nrows();
    let qr = a.qr();
    let q = qr.compute_Q();
    let r = qr.R();

    // Check if R is singular
    for i in 0..n {
        if r[(i, i)].abs() < QR_PIVOT_TOLERANCE {
            return None;
        }
    }

    // Solve R x = Q'b
    let qtb = q.transpose() * b;

    let mut x = Col::zeros(n);
    for i in (0..n).rev() {
        let mut sum = qtb[i];
        for j in (i + 1)..n {
            sum -= r[(i, j)] * x[j];
        }
        x[i] = sum / r[(i, i)];
    }

    Some(x)
}

/// Invert `a` by QR, one back-substitution per column of Qᵗ.
fn qr_inverse(a: &Mat<f64>) -> Option<Mat<f64>> {
    let n = a.nrows();
    let qr = a.qr();
    let q = qr.compute_Q();
    let r = qr.R();

    for i in 0..n {
        if r[(i, i)].abs() < QR_PIVOT_TOLERANCE {
            return None;
        }
    }

    let mut inv = Mat::zeros(n, n);
    let qt = q.transpose();

    for col in 0..n {
        for i in (0..n).rev() {
            let mut sum = qt[(i, col)];
            for j in (i + 1)..n {
                sum -= r[(i, j)] * inv[(j, col)];
            }
            inv[(i, col)] = sum / r[(i, i)];
        }
    }

    Some(inv)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spd() -> Mat<f64> {
        Mat::from_fn(3, 3, |i, j| if i == j { 4.0 } else { 1.0 })
    }

    #[test]
    fn test_solve_well_conditioned() {
        let a = spd();
        let expected = Col::from_fn(3, |i| (i + 1) as f64);
        let b = &a * &expected;

        let solution = solve_normal_equations(&a, &b, 1e10).unwrap();
        assert!(solution.diagnostics.is_empty());
        assert!(solution.condition_number < 10.0);
        for i in 0..3 {
            assert!((solution.value[i] - expected[i]).abs() < 1e-10);
        }
    }

    #[test]
    fn test_singular_falls_back_to_pseudo_inverse() {
        // Two identical columns
        let x = Mat::from_fn(5, 2, |i, _| i as f64 + 1.0);
        let a = gram_matrix(&x, 0.0, false);
        let b = x.transpose() * &Col::from_fn(5, |i| 2.0 * (i as f64 + 1.0));

        let solution = solve_normal_equations(&a, &b, 1e10).unwrap();
        assert!(solution
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::IllConditioned { .. })));
        assert!(solution
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::PseudoInverseFallback { rank: 1, dimension: 2 })));
        // Minimum-norm solution splits the weight evenly
        assert!((solution.value[0] - 1.0).abs() < 1e-8);
        assert!((solution.value[1] - 1.0).abs() < 1e-8);
    }

    #[test]
    fn test_invert_symmetric() {
        let a = spd();
        let inv = invert_symmetric(&a, 1e10).unwrap().value;
        let product = &a * &inv;
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((product[(i, j)] - expected).abs() < 1e-10);
            }
            for j in 0..3 {
                assert_eq!(inv[(i, j)], inv[(j, i)]);
            }
        }
    }

    #[test]
    fn test_gram_matrix_penalty_skips_intercept() {
        let x = Mat::from_fn(4, 2, |i, j| if j == 0 { 1.0 } else { i as f64 });
        let plain = gram_matrix(&x, 0.0, false);
        let penalized = gram_matrix(&x, 2.0, true);
        assert_eq!(penalized[(0, 0)], plain[(0, 0)]);
        assert_eq!(penalized[(1, 1)], plain[(1, 1)] + 2.0);
        assert_eq!(penalized[(0, 1)], plain[(0, 1)]);
    }
}
