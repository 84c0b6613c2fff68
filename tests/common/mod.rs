//! Common test utilities and data generators.

#![allow(dead_code)]

use faer::{Col, Mat};
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use statrs::distribution::Normal;

fn standard_normal() -> Normal {
    Normal::new(0.0, 1.0).expect("valid normal parameters")
}

/// Generate Gaussian linear data: y = intercept + X·β + noise.
///
/// Features are i.i.d. N(0, 1), the true slopes are 1, 2, ..., n_features and
/// the noise is N(0, noise_std²). Returns (X, y, true slopes).
pub fn generate_linear_data(
    n_samples: usize,
    n_features: usize,
    intercept: f64,
    noise_std: f64,
    seed: u64,
) -> (Mat<f64>, Col<f64>, Col<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = standard_normal();

    let true_coefficients = Col::from_fn(n_features, |j| (j + 1) as f64);
    let x = Mat::from_fn(n_samples, n_features, |_, _| normal.sample(&mut rng));

    let mut y = Col::zeros(n_samples);
    for i in 0..n_samples {
        let mut yi = intercept;
        for j in 0..n_features {
            yi += x[(i, j)] * true_coefficients[j];
        }
        y[i] = yi + noise_std * normal.sample(&mut rng);
    }

    (x, y, true_coefficients)
}

/// Generate linear data whose errors follow an AR(1) process with
/// correlation `rho` and unit innovations. Returns (X, y, true slopes).
pub fn generate_ar1_data(
    n_samples: usize,
    n_features: usize,
    intercept: f64,
    rho: f64,
    seed: u64,
) -> (Mat<f64>, Col<f64>, Col<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = standard_normal();

    let true_coefficients = Col::from_fn(n_features, |j| 0.5 * (j + 1) as f64);
    let x = Mat::from_fn(n_samples, n_features, |_, _| normal.sample(&mut rng));

    // Stationary start so that Var(e_t) = 1 / (1 - rho²) for every t
    let mut e = normal.sample(&mut rng) / (1.0 - rho * rho).sqrt();
    let mut y = Col::zeros(n_samples);
    for i in 0..n_samples {
        if i > 0 {
            e = rho * e + normal.sample(&mut rng);
        }
        let mut yi = intercept + e;
        for j in 0..n_features {
            yi += x[(i, j)] * true_coefficients[j];
        }
        y[i] = yi;
    }

    (x, y, true_coefficients)
}

/// Covariance of a stationary AR(1) process with unit innovations.
pub fn ar1_covariance(n: usize, rho: f64) -> Mat<f64> {
    let scale = 1.0 / (1.0 - rho * rho);
    Mat::from_fn(n, n, |i, j| scale * rho.powi((i as i32 - j as i32).abs()))
}

/// Closed-form inverse of [`ar1_covariance`] (tridiagonal).
pub fn ar1_precision(n: usize, rho: f64) -> Mat<f64> {
    Mat::from_fn(n, n, |i, j| {
        if i == j {
            if i == 0 || i == n - 1 {
                1.0
            } else {
                1.0 + rho * rho
            }
        } else if i.abs_diff(j) == 1 {
            -rho
        } else {
            0.0
        }
    })
}

/// Generate data with more features than observations.
pub fn generate_wide_data(n_samples: usize, n_features: usize, seed: u64) -> (Mat<f64>, Col<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = standard_normal();

    let x = Mat::from_fn(n_samples, n_features, |_, _| normal.sample(&mut rng));
    let y = Col::from_fn(n_samples, |i| {
        2.0 + x[(i, 0)] - 0.5 * x[(i, 1)] + 0.1 * normal.sample(&mut rng)
    });

    (x, y)
}

/// Generate noiseless data with two perfectly collinear features.
pub fn generate_collinear_data(n_samples: usize) -> (Mat<f64>, Col<f64>) {
    let mut x = Mat::zeros(n_samples, 3);
    let mut y = Col::zeros(n_samples);

    for i in 0..n_samples {
        x[(i, 0)] = i as f64;
        x[(i, 1)] = 2.0 * i as f64; // Perfectly collinear with x0
        x[(i, 2)] = ((i * i) % 7) as f64;
        y[i] = 1.0 + 2.0 * x[(i, 0)] + 3.0 * x[(i, 2)];
    }

    (x, y)
}

/// Symmetric with a nonnegative diagonal.
pub fn assert_valid_covariance(cov: &Mat<f64>, tol: f64) {
    assert_eq!(cov.nrows(), cov.ncols());
    for i in 0..cov.nrows() {
        assert!(cov[(i, i)].is_finite(), "non-finite variance at {}", i);
        assert!(cov[(i, i)] >= 0.0, "negative variance at {}", i);
        for j in 0..i {
            assert!(
                (cov[(i, j)] - cov[(j, i)]).abs() <= tol,
                "asymmetric at ({}, {})",
                i,
                j
            );
        }
    }
}
