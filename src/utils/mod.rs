//! Utility functions for design matrices.

mod matrix;

pub use matrix::{prepare_design_matrix, AsDesignMatrix, LabeledMatrix};
pub(crate) use matrix::{augment, l2_norm};
