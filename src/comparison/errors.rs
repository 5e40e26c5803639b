//! comparison::errors — failures of the validation harness.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

use crate::zeta::ZetaError;

pub type ComparisonResult<T> = Result<T, ComparisonError>;

/// ComparisonError — invalid harness configuration or an evaluator failure.
///
/// Oracle failures are not errors here: they are collected per cell in the
/// report so one out-of-domain oracle does not abort a sweep.
#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonError {
    // ---- Grid ----
    EmptyGrid,

    InvalidGridValue { axis: &'static str, value: f64, reason: &'static str },

    InvalidLinspace { reason: &'static str },

    // ---- Tolerances ----
    InvalidTolerance { name: &'static str, value: f64 },

    // ---- Oracles ----
    NoOracles,

    // ---- Evaluator ----
    Zeta(ZetaError),
}

impl std::error::Error for ComparisonError {}

impl std::fmt::Display for ComparisonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComparisonError::EmptyGrid => write!(f, "Validation grid has no cells."),
            ComparisonError::InvalidGridValue { axis, value, reason } => {
                write!(f, "Invalid {axis} grid value {value}: {reason}")
            }
            ComparisonError::InvalidLinspace { reason } => write!(f, "Invalid linspace: {reason}"),
            ComparisonError::InvalidTolerance { name, value } => {
                write!(f, "Tolerance {name} = {value} must be finite and positive.")
            }
            ComparisonError::NoOracles => write!(f, "At least one reference oracle is required."),
            ComparisonError::Zeta(err) => write!(f, "Evaluator failed: {err}"),
        }
    }
}

impl From<ZetaError> for ComparisonError {
    fn from(err: ZetaError) -> Self {
        ComparisonError::Zeta(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<ComparisonError> for PyErr {
    fn from(err: ComparisonError) -> PyErr {
        PyValueError::new_err(format!("ComparisonError: {err}"))
    }
}
