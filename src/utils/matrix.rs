//! Matrix utility functions.

use crate::solvers::RegressionError;
use faer::{Col, Mat, MatRef};

/// A source that can be normalized into a dense `f64` design matrix.
pub trait AsDesignMatrix {
    /// Produce a dense `(n_samples, n_features)` matrix.
    fn to_design_matrix(&self) -> Result<Mat<f64>, RegressionError>;
}

impl AsDesignMatrix for Mat<f64> {
    fn to_design_matrix(&self) -> Result<Mat<f64>, RegressionError> {
        Ok(self.clone())
    }
}

impl AsDesignMatrix for MatRef<'_, f64> {
    fn to_design_matrix(&self) -> Result<Mat<f64>, RegressionError> {
        Ok(self.to_owned())
    }
}

/// Row-major nested rows. All rows must have the same length.
impl AsDesignMatrix for [Vec<f64>] {
    fn to_design_matrix(&self) -> Result<Mat<f64>, RegressionError> {
        let n_rows = self.len();
        let n_cols = self.first().map_or(0, Vec::len);

        if let Some((i, row)) = self.iter().enumerate().find(|(_, r)| r.len() != n_cols) {
            return Err(RegressionError::InvalidInput(format!(
                "row {} has {} values, expected {}",
                i,
                row.len(),
                n_cols
            )));
        }

        Ok(Mat::from_fn(n_rows, n_cols, |i, j| self[i][j]))
    }
}

impl AsDesignMatrix for Vec<Vec<f64>> {
    fn to_design_matrix(&self) -> Result<Mat<f64>, RegressionError> {
        self.as_slice().to_design_matrix()
    }
}

/// A column-oriented table of named numeric features.
#[derive(Debug, Clone)]
pub struct LabeledMatrix {
    names: Vec<String>,
    data: Mat<f64>,
}

impl LabeledMatrix {
    /// Build a table from named columns of equal length.
    pub fn from_columns<S: Into<String>>(
        columns: impl IntoIterator<Item = (S, Col<f64>)>,
    ) -> Result<Self, RegressionError> {
        let (names, cols): (Vec<String>, Vec<Col<f64>>) = columns
            .into_iter()
            .map(|(name, col)| (name.into(), col))
            .unzip();

        let n_rows = cols.first().map_or(0, |c| c.nrows());
        if let Some((name, col)) = names
            .iter()
            .zip(cols.iter())
            .find(|(_, c)| c.nrows() != n_rows)
        {
            return Err(RegressionError::InvalidInput(format!(
                "column '{}' has {} rows, expected {}",
                name,
                col.nrows(),
                n_rows
            )));
        }

        let data = Mat::from_fn(n_rows, cols.len(), |i, j| cols[j][i]);
        Ok(Self { names, data })
    }

    /// Attach column names to an existing matrix.
    pub fn new(names: Vec<String>, data: Mat<f64>) -> Result<Self, RegressionError> {
        if names.len() != data.ncols() {
            return Err(RegressionError::InvalidInput(format!(
                "{} column names for a matrix with {} columns",
                names.len(),
                data.ncols()
            )));
        }
        Ok(Self { names, data })
    }

    /// Column names in order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Index of the named column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// The numeric data.
    pub fn as_mat(&self) -> &Mat<f64> {
        &self.data
    }

    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }
}

impl AsDesignMatrix for LabeledMatrix {
    fn to_design_matrix(&self) -> Result<Mat<f64>, RegressionError> {
        Ok(self.data.clone())
    }
}

/// Build the design matrix used by every estimator.
///
/// With `with_intercept`, a leading column of ones is prepended; otherwise the
/// normalized input is returned unchanged. The input is never mutated.
pub fn prepare_design_matrix<D: AsDesignMatrix + ?Sized>(
    x: &D,
    with_intercept: bool,
) -> Result<Mat<f64>, RegressionError> {
    let x = x.to_design_matrix()?;
    Ok(augment(&x, with_intercept))
}

/// Infallible form of [`prepare_design_matrix`] for dense inputs.
pub(crate) fn augment(x: &Mat<f64>, with_intercept: bool) -> Mat<f64> {
    if !with_intercept {
        return x.clone();
    }
    Mat::from_fn(x.nrows(), x.ncols() + 1, |i, j| {
        if j == 0 {
            1.0
        } else {
            x[(i, j - 1)]
        }
    })
}

/// Euclidean norm of a column.
pub(crate) fn l2_norm(v: &Col<f64>) -> f64 {
    v.iter().map(|&x| x * x).sum::<f64>().sqrt()
}
