//! reference::errors — failures of the reference (oracle) paths.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type ReferenceResult<T> = Result<T, ReferenceError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceError {
    // ---- Domain ----
    OutOfDomain {
        oracle: &'static str,
        alpha: f64,
        q: f64,
        reason: &'static str,
    },

    // ---- Quadrature ----
    QuadratureNotConverged {
        estimate: f64,
        error: f64,
        levels: usize,
    },

    NonFiniteIntegrand {
        x: f64,
    },

    InvalidQuadratureOptions {
        reason: &'static str,
    },

    // ---- Finite differences ----
    InvalidStep {
        step: f64,
        reason: &'static str,
    },
}

impl std::error::Error for ReferenceError {}

impl std::fmt::Display for ReferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceError::OutOfDomain { oracle, alpha, q, reason } => {
                write!(f, "{oracle}: (alpha = {alpha}, q = {q}) out of domain: {reason}")
            }
            ReferenceError::QuadratureNotConverged { estimate, error, levels } => write!(
                f,
                "Quadrature did not converge after {levels} levels \
                 (estimate {estimate}, error {error:e})"
            ),
            ReferenceError::NonFiniteIntegrand { x } => {
                write!(f, "Non-finite integrand at x = {x}")
            }
            ReferenceError::InvalidQuadratureOptions { reason } => {
                write!(f, "Invalid quadrature options: {reason}")
            }
            ReferenceError::InvalidStep { step, reason } => {
                write!(f, "Invalid finite-difference step {step}: {reason}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<ReferenceError> for PyErr {
    fn from(err: ReferenceError) -> PyErr {
        PyValueError::new_err(format!("ReferenceError: {err}"))
    }
}
