//! statistical_tests::errors — error type for goodness-of-fit checks.
//!
//! Purpose
//! -------
//! Give the χ² goodness-of-fit routine a small, cloneable error surface and
//! a bridge to Python exceptions. Validation failures carry the offending
//! value so logs are meaningful without the original sample.
//!
//! Conventions
//! -----------
//! - Messages are phrased in terms of domain constraints ("expected count
//!   must be positive", "at least two bins") rather than internals.
//! - The power-law harness wraps [`GofError`] in its own error enum; the
//!   Python layer raises `ValueError` with the `Debug` text.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type GofResult<T> = Result<T, GofError>;

/// GofError — failures of the χ² goodness-of-fit test.
///
/// Variants
/// --------
/// - `EmptySample`: no observations were supplied.
/// - `InvalidMinExpected(value)`: the pooling threshold is not finite and
///   positive.
/// - `ValueBelowSupport { value, y_min }`: an observation lies below the
///   support of the hypothesized law.
/// - `InvalidPmf { k, value }`: the pmf returned a negative or non-finite
///   mass at `k`.
/// - `InsufficientBins { bins, estimated }`: after pooling, the bins leave
///   no degrees of freedom once `estimated` parameters are accounted for.
#[derive(Debug, Clone, PartialEq)]
pub enum GofError {
    EmptySample,
    InvalidMinExpected(f64),
    ValueBelowSupport { value: u64, y_min: u64 },
    InvalidPmf { k: u64, value: f64 },
    InsufficientBins { bins: usize, estimated: usize },
}

impl std::error::Error for GofError {}

impl std::fmt::Display for GofError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GofError::EmptySample => write!(f, "Need at least one observation."),
            GofError::InvalidMinExpected(value) => {
                write!(f, "Invalid minimum expected count: {value}. Must be finite and positive.")
            }
            GofError::ValueBelowSupport { value, y_min } => {
                write!(f, "Observation {value} lies below the support minimum {y_min}.")
            }
            GofError::InvalidPmf { k, value } => {
                write!(f, "Invalid probability mass {value} at k = {k}.")
            }
            GofError::InsufficientBins { bins, estimated } => write!(
                f,
                "Only {bins} pooled bins with {estimated} estimated parameters; \
                 the test has no degrees of freedom."
            ),
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<GofError> for PyErr {
    fn from(err: GofError) -> PyErr {
        PyValueError::new_err(format!("GofError: {err:?}"))
    }
}
