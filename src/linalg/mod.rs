//! Dense linear solve primitives shared by the estimators.

mod normal;
mod spectrum;
mod whitening;

pub(crate) use normal::{gram_matrix, invert_symmetric, solve_normal_equations};
pub(crate) use spectrum::symmetrize;
pub(crate) use whitening::Whitener;
