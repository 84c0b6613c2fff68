//! Summary report and design matrix tests.

mod common;

use approx::assert_relative_eq;
use faer::{Col, Mat};
use linfit::prelude::*;

#[test]
fn test_noiseless_r_squared_is_one() {
    let (x, _, _) = common::generate_linear_data(30, 3, 0.0, 0.0, 1);
    let y = Col::from_fn(30, |i| 4.0 + x[(i, 0)] - 2.0 * x[(i, 1)] + 0.5 * x[(i, 2)]);

    let fitted = OlsRegressor::builder().build().fit(&x, &y).unwrap();
    let report = summary(&fitted, &x, &y).unwrap();

    assert_relative_eq!(report.r_squared, 1.0, epsilon = 1e-10);
    assert_relative_eq!(report.coefficients[0], 4.0, epsilon = 1e-10);
    assert_relative_eq!(report.coefficients[2], -2.0, epsilon = 1e-10);
}

#[test]
fn test_r_squared_in_unit_interval() {
    let (x, y, _) = common::generate_linear_data(50, 2, 1.0, 5.0, 3);

    let fitted = OlsRegressor::builder().build().fit(&x, &y).unwrap();
    let report = summary(&fitted, &x, &y).unwrap();

    assert!(report.r_squared >= 0.0 && report.r_squared <= 1.0);
    assert_relative_eq!(report.r_squared, fitted.r_squared(), epsilon = 1e-12);
    assert!(report.adj_r_squared < report.r_squared);
}

#[test]
fn test_inference_columns_consistent_with_variance() {
    let (x, y, _) = common::generate_linear_data(80, 3, 2.0, 1.0, 23);

    let fitted = OlsRegressor::builder().build().fit(&x, &y).unwrap();
    let report = summary(&fitted, &x, &y).unwrap();
    let cov = fitted.estimate_variance(&x, &y).unwrap().value;

    let se = report.std_errors.as_ref().expect("n > p gives standard errors");
    let t = report.t_statistics.as_ref().unwrap();
    let p = report.p_values.as_ref().unwrap();
    let lower = report.conf_interval_lower.as_ref().unwrap();
    let upper = report.conf_interval_upper.as_ref().unwrap();

    for j in 0..4 {
        assert_relative_eq!(se[j], cov[(j, j)].sqrt(), epsilon = 1e-12);
        assert_relative_eq!(t[j], report.coefficients[j] / se[j], epsilon = 1e-10);
        assert!((0.0..=1.0).contains(&p[j]));
        assert!(lower[j] < report.coefficients[j] && report.coefficients[j] < upper[j]);
    }

    // Slopes 1, 2, 3 with unit noise are all clearly significant
    for j in 1..4 {
        assert!(p[j] < 1e-6);
    }
    assert_eq!(report.n_observations, 80);
    assert_eq!(report.n_parameters, 4);
    assert_eq!(report.confidence_level, 0.95);
}

#[test]
fn test_wider_level_gives_wider_intervals() {
    let (x, y, _) = common::generate_linear_data(40, 2, 0.0, 1.0, 31);
    let fitted = OlsRegressor::builder().build().fit(&x, &y).unwrap();

    let narrow = summary_with_level(&fitted, &x, &y, 0.90).unwrap();
    let wide = summary_with_level(&fitted, &x, &y, 0.99).unwrap();

    let narrow_width = narrow.conf_interval_upper.unwrap()[1] - narrow.conf_interval_lower.unwrap()[1];
    let wide_width = wide.conf_interval_upper.unwrap()[1] - wide.conf_interval_lower.unwrap()[1];
    assert!(wide_width > narrow_width);
}

#[test]
fn test_invalid_confidence_level() {
    let (x, y, _) = common::generate_linear_data(20, 1, 0.0, 1.0, 2);
    let fitted = OlsRegressor::builder().build().fit(&x, &y).unwrap();

    assert!(matches!(
        summary_with_level(&fitted, &x, &y, 1.5),
        Err(RegressionError::InvalidInput(_))
    ));
}

#[test]
fn test_summary_is_generic_over_estimators() {
    let n = 40;
    let (x, y, _) = common::generate_linear_data(n, 2, 1.0, 0.5, 12);

    let models: Vec<Box<dyn FittedRegressor>> = vec![
        Box::new(OlsRegressor::builder().build().fit(&x, &y).unwrap()),
        Box::new(
            GlsRegressor::builder()
                .sigma(Mat::identity(n, n))
                .build()
                .fit(&x, &y)
                .unwrap(),
        ),
        Box::new(RidgeRegressor::builder().alpha(0.5).build().fit(&x, &y).unwrap()),
    ];

    for model in &models {
        let report = summary(model.as_ref(), &x, &y).unwrap();
        assert!(report.r_squared > 0.9);
        assert!(report.std_errors.is_some());
    }

    let ridge_report = summary(models[2].as_ref(), &x, &y).unwrap();
    assert!(ridge_report
        .diagnostics
        .contains(&Diagnostic::HomoskedasticityAssumed));
}

#[test]
fn test_wide_ols_summary_has_no_inference() {
    let (x, y) = common::generate_wide_data(20, 50, 11);
    let fitted = OlsRegressor::builder().build().fit(&x, &y).unwrap();

    let report = summary(&fitted, &x, &y).unwrap();
    assert!(report.std_errors.is_none());
    assert!(report.p_values.is_none());
    assert!(report.adj_r_squared.is_nan());
}

#[test]
fn test_constant_response() {
    let x = Mat::from_fn(6, 1, |i, _| i as f64);
    let y = Col::from_fn(6, |_| 3.0);

    let fitted = OlsRegressor::builder().build().fit(&x, &y).unwrap();
    let report = summary(&fitted, &x, &y).unwrap();
    assert_eq!(report.r_squared, 1.0);
}

#[test]
fn test_constant_response_with_inexact_mean() {
    for v in [0.1, 0.7, 3.3] {
        for n in [3, 7, 10] {
            let x = Mat::from_fn(n, 1, |i, _| i as f64);
            let y = Col::from_fn(n, |_| v);

            let fitted = OlsRegressor::builder().build().fit(&x, &y).unwrap();
            let report = summary(&fitted, &x, &y).unwrap();

            assert_eq!(report.r_squared, 1.0, "y = {} with n = {}", v, n);
            assert_eq!(fitted.r_squared(), 1.0, "y = {} with n = {}", v, n);
            assert!(report.adj_r_squared.is_nan() || report.adj_r_squared <= 1.0);
        }
    }
}

#[test]
fn test_gls_summary_on_held_out_rows() {
    let (x, y, _) = common::generate_ar1_data(55, 2, 1.0, 0.5, 17);
    let x_train = Mat::from_fn(40, 2, |i, j| x[(i, j)]);
    let y_train = Col::from_fn(40, |i| y[i]);
    let x_test = Mat::from_fn(15, 2, |i, j| x[(i + 40, j)]);
    let y_test = Col::from_fn(15, |i| y[i + 40]);

    let fitted = GlsRegressor::builder()
        .sigma(common::ar1_covariance(40, 0.5))
        .build()
        .fit(&x_train, &y_train)
        .unwrap();

    let report = summary(&fitted, &x_test, &y_test).expect("held-out rows still summarize");
    assert!(report.r_squared.is_finite());
    assert_eq!(report.n_observations, 15);
    for j in 0..3 {
        assert_eq!(report.coefficients[j], fitted.beta()[j]);
    }
    assert!(report.std_errors.is_none());
    assert!(report.p_values.is_none());
    assert!(report.conf_interval_lower.is_none());
}

#[test]
fn test_display_lists_every_term() {
    let (x, y, _) = common::generate_linear_data(25, 2, 0.0, 1.0, 4);
    let fitted = OlsRegressor::builder().build().fit(&x, &y).unwrap();

    let text = summary(&fitted, &x, &y).unwrap().to_string();
    assert!(text.contains("b0"));
    assert!(text.contains("b2"));
    assert!(text.contains("R²"));
}

// ============================================================================
// Design matrix inputs
// ============================================================================

#[test]
fn test_prepare_from_rows_and_labels() {
    let rows = vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]];
    let from_rows = prepare_design_matrix(&rows, true).unwrap();
    assert_eq!(from_rows.ncols(), 3);
    assert_eq!(from_rows[(1, 0)], 1.0);
    assert_eq!(from_rows[(1, 2)], 4.0);

    let table = LabeledMatrix::from_columns(vec![
        ("a", Col::from_fn(3, |i| (2 * i + 1) as f64)),
        ("b", Col::from_fn(3, |i| (2 * i + 2) as f64)),
    ])
    .unwrap();
    assert_eq!(table.column_index("b"), Some(1));

    let from_table = prepare_design_matrix(&table, true).unwrap();
    for i in 0..3 {
        for j in 0..3 {
            assert_eq!(from_table[(i, j)], from_rows[(i, j)]);
        }
    }

    let without = prepare_design_matrix(&table, false).unwrap();
    assert_eq!(without.ncols(), 2);
    assert_eq!(without[(2, 1)], 6.0);
}

#[test]
fn test_ragged_rows_rejected() {
    let rows = vec![vec![1.0, 2.0], vec![3.0]];
    assert!(matches!(
        prepare_design_matrix(&rows, false),
        Err(RegressionError::InvalidInput(_))
    ));
}
