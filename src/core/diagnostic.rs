//! Advisory numerical conditions raised alongside computed values.

use std::fmt;

/// A non-fatal condition detected while fitting or estimating.
///
/// Diagnostics never change control flow; they travel with the value that
/// produced them so callers can inspect (or assert on) them.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// The normal matrix has a condition number above the configured threshold.
    IllConditioned {
        condition_number: f64,
        threshold: f64,
    },
    /// The normal matrix was numerically singular and a pseudo-inverse was used.
    PseudoInverseFallback { rank: usize, dimension: usize },
    /// The variance estimate is only exact under homoskedastic errors.
    HomoskedasticityAssumed,
    /// Gradient descent stopped at its iteration cap.
    NotConverged { iterations: usize, last_step: f64 },
}

impl Diagnostic {
    /// Whether this diagnostic concerns numerical conditioning.
    pub fn is_conditioning(&self) -> bool {
        matches!(
            self,
            Diagnostic::IllConditioned { .. } | Diagnostic::PseudoInverseFallback { .. }
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::IllConditioned {
                condition_number,
                threshold,
            } => write!(
                f,
                "X'X is ill-conditioned (condition number {:.3e} > {:.1e}); consider regularization",
                condition_number, threshold
            ),
            Diagnostic::PseudoInverseFallback { rank, dimension } => write!(
                f,
                "X'X is singular (rank {} of {}); solved with the pseudo-inverse",
                rank, dimension
            ),
            Diagnostic::HomoskedasticityAssumed => write!(
                f,
                "ridge variance estimate assumes homoskedastic errors"
            ),
            Diagnostic::NotConverged {
                iterations,
                last_step,
            } => write!(
                f,
                "gradient descent did not converge after {} iterations (last step {:.3e})",
                iterations, last_step
            ),
        }
    }
}

/// A computed value together with the diagnostics raised while computing it.
#[derive(Debug, Clone)]
pub struct Diagnosed<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Diagnosed<T> {
    /// Wrap a value with no diagnostics.
    pub fn clean(value: T) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }

    /// Wrap a value with the given diagnostics.
    pub fn new(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self { value, diagnostics }
    }

    /// True if any ill-conditioning or pseudo-inverse diagnostic was raised.
    pub fn is_ill_conditioned(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_conditioning)
    }

    /// Transform the value, keeping the diagnostics.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Diagnosed<U> {
        Diagnosed {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }

    /// Drop the diagnostics.
    pub fn into_value(self) -> T {
        self.value
    }
}
