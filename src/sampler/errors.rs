//! sampler::errors — failures at the sampler boundary.
//!
//! Divergent transitions are not errors; they are counted per chain in
//! [`ChainDraws`](crate::sampler::ChainDraws). Errors here mean no usable
//! draws could be produced.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type SamplerResult<T> = Result<T, SamplerError>;

#[derive(Debug, Clone, PartialEq)]
pub enum SamplerError {
    // ---- Configuration ----
    InvalidOptions { reason: &'static str },

    InvalidInput { reason: &'static str },

    // ---- Initialization ----
    InvalidInitialPoint { theta: f64, reason: String },

    // ---- Density ----
    /// The log density or its gradient could not be evaluated.
    Density { text: String },

    NonFiniteDensity { theta: f64 },

    // ---- Output ----
    EmptyDraws,
}

impl std::error::Error for SamplerError {}

impl std::fmt::Display for SamplerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SamplerError::InvalidOptions { reason } => {
                write!(f, "Invalid sampler options: {reason}")
            }
            SamplerError::InvalidInput { reason } => write!(f, "Invalid sampler input: {reason}"),
            SamplerError::InvalidInitialPoint { theta, reason } => {
                write!(f, "No usable initial point near theta = {theta}: {reason}")
            }
            SamplerError::Density { text } => write!(f, "Log density evaluation failed: {text}"),
            SamplerError::NonFiniteDensity { theta } => {
                write!(f, "Log density or gradient is not finite at theta = {theta}")
            }
            SamplerError::EmptyDraws => write!(f, "No posterior draws available."),
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<SamplerError> for PyErr {
    fn from(err: SamplerError) -> PyErr {
        PyValueError::new_err(format!("SamplerError: {err}"))
    }
}
