//! zeta::errors — error type for the Hurwitz zeta evaluator.
//!
//! `ZetaError` collects domain violations on `(α, q)`, the pole at α = 1,
//! near-pole rejections from the checked tail entry point, non-finite
//! results, and invalid truncation configurations. The alias
//! `ZetaResult<T>` is used by every fallible function in `zeta`.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type ZetaResult<T> = Result<T, ZetaError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ZetaError {
    // ---- Domain ----
    InvalidAlpha {
        value: f64,
        reason: &'static str,
    },

    InvalidOffset {
        value: f64,
        reason: &'static str,
    },

    Pole {
        alpha: f64,
    },

    NearPole {
        alpha: f64,
        distance: f64,
        threshold: f64,
    },

    // ---- Result ----
    NonFiniteResult {
        alpha: f64,
        q: f64,
    },

    // ---- TruncationConfig ----
    InvalidTermBudget {
        min_terms: usize,
        max_terms: usize,
        reason: &'static str,
    },

    InvalidTailOrder {
        order: usize,
        reason: &'static str,
    },

    InvalidRelTol {
        tol: f64,
        reason: &'static str,
    },

    InvalidPoleEps {
        eps: f64,
        reason: &'static str,
    },
}

impl std::error::Error for ZetaError {}

impl std::fmt::Display for ZetaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Domain ----
            ZetaError::InvalidAlpha { value, reason } => {
                write!(f, "Invalid shape parameter alpha = {value}: {reason}")
            }
            ZetaError::InvalidOffset { value, reason } => {
                write!(f, "Invalid offset q = {value}: {reason}")
            }
            ZetaError::Pole { alpha } => {
                write!(f, "Hurwitz zeta has a pole at alpha = {alpha}")
            }
            ZetaError::NearPole { alpha, distance, threshold } => write!(
                f,
                "alpha = {alpha} is within {distance:e} of the pole (threshold {threshold:e})"
            ),

            // ---- Result ----
            ZetaError::NonFiniteResult { alpha, q } => {
                write!(f, "Non-finite zeta evaluation at alpha = {alpha}, q = {q}")
            }

            // ---- TruncationConfig ----
            ZetaError::InvalidTermBudget { min_terms, max_terms, reason } => {
                write!(f, "Invalid term budget [{min_terms}, {max_terms}]: {reason}")
            }
            ZetaError::InvalidTailOrder { order, reason } => {
                write!(f, "Invalid tail order {order}: {reason}")
            }
            ZetaError::InvalidRelTol { tol, reason } => {
                write!(f, "Invalid relative tolerance {tol}: {reason}")
            }
            ZetaError::InvalidPoleEps { eps, reason } => {
                write!(f, "Invalid near-pole threshold {eps}: {reason}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<ZetaError> for PyErr {
    fn from(err: ZetaError) -> PyErr {
        PyValueError::new_err(format!("ZetaError: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `Display` formatting of the domain and configuration variants.
    //
    // They intentionally DO NOT cover:
    // - The `From<ZetaError> for PyErr` conversion, which needs a Python
    //   interpreter.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that domain errors carry the offending value and reason.
    //
    // Given
    // -----
    // - `ZetaError::InvalidAlpha` with value -1 and a short reason.
    //
    // Expect
    // ------
    // - The message contains both "-1" and the reason text.
    fn invalid_alpha_display_includes_value_and_reason() {
        // Arrange
        let err = ZetaError::InvalidAlpha { value: -1.0, reason: "must be positive" };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("-1"), "Got: {msg}");
        assert!(msg.contains("must be positive"), "Got: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Ensure the near-pole message reports the threshold that was crossed.
    //
    // Given
    // -----
    // - `ZetaError::NearPole` with threshold 1e-6.
    //
    // Expect
    // ------
    // - The message contains "1e-6".
    fn near_pole_display_reports_threshold() {
        // Arrange
        let err = ZetaError::NearPole { alpha: 1.0000001, distance: 1e-7, threshold: 1e-6 };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("1e-6"), "Got: {msg}");
    }
}
