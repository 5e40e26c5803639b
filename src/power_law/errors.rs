//! power_law::errors — failures of the discrete power-law harness.
//!
//! Zeta, optimizer, sampler and goodness-of-fit errors are wrapped so the
//! harness exposes a single [`PowerLawResult`]. Posterior-density failures
//! travel the other way (`PowerLawError → SamplerError`) because the sampler
//! owns the boundary they cross.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

use crate::{
    optimization::errors::OptError, sampler::errors::SamplerError,
    statistical_tests::errors::GofError, zeta::errors::ZetaError,
};

pub type PowerLawResult<T> = Result<T, PowerLawError>;

#[derive(Debug, Clone, PartialEq)]
pub enum PowerLawError {
    // ---- Parameters ----
    /// α must be finite and strictly greater than 1.
    InvalidShape {
        value: f64,
        reason: &'static str,
    },

    InvalidMinimum {
        value: u64,
    },

    InvalidUpperBound {
        upper: u64,
        y_min: u64,
    },

    InvalidPrior {
        shape: f64,
        rate: f64,
        reason: &'static str,
    },

    // ---- Data ----
    InvalidSampleSize {
        n: usize,
    },

    EmptyData,

    ValueBelowMinimum {
        value: u64,
        y_min: u64,
    },

    InvalidFrequencyTable {
        reason: &'static str,
    },

    // ---- Evaluation ----
    NonFiniteLikelihood {
        alpha: f64,
    },

    // ---- Experiment ----
    InvalidExperiment {
        reason: &'static str,
    },

    // ---- Wrapped ----
    Zeta(ZetaError),
    Fit(OptError),
    Sampler(SamplerError),
    GoodnessOfFit(GofError),
}

impl std::error::Error for PowerLawError {}

impl std::fmt::Display for PowerLawError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PowerLawError::InvalidShape { value, reason } => {
                write!(f, "Invalid shape alpha = {value}: {reason}")
            }
            PowerLawError::InvalidMinimum { value } => {
                write!(f, "Invalid y_min = {value}: must be at least 1")
            }
            PowerLawError::InvalidUpperBound { upper, y_min } => {
                write!(f, "Upper bound {upper} is below y_min = {y_min}")
            }
            PowerLawError::InvalidPrior { shape, rate, reason } => {
                write!(f, "Invalid Gamma prior (shape {shape}, rate {rate}): {reason}")
            }
            PowerLawError::InvalidSampleSize { n } => {
                write!(f, "Invalid sample size {n}: must be at least 1")
            }
            PowerLawError::EmptyData => write!(f, "No observations"),
            PowerLawError::ValueBelowMinimum { value, y_min } => {
                write!(f, "Observation {value} lies below y_min = {y_min}")
            }
            PowerLawError::InvalidFrequencyTable { reason } => {
                write!(f, "Invalid frequency table: {reason}")
            }
            PowerLawError::NonFiniteLikelihood { alpha } => {
                write!(f, "Log-likelihood is not finite at alpha = {alpha}")
            }
            PowerLawError::InvalidExperiment { reason } => {
                write!(f, "Invalid experiment options: {reason}")
            }
            PowerLawError::Zeta(err) => write!(f, "{err}"),
            PowerLawError::Fit(err) => write!(f, "Maximum likelihood fit failed: {err}"),
            PowerLawError::Sampler(err) => write!(f, "{err}"),
            PowerLawError::GoodnessOfFit(err) => write!(f, "{err}"),
        }
    }
}

impl From<ZetaError> for PowerLawError {
    fn from(err: ZetaError) -> Self {
        PowerLawError::Zeta(err)
    }
}

impl From<OptError> for PowerLawError {
    fn from(err: OptError) -> Self {
        PowerLawError::Fit(err)
    }
}

impl From<SamplerError> for PowerLawError {
    fn from(err: SamplerError) -> Self {
        PowerLawError::Sampler(err)
    }
}

impl From<GofError> for PowerLawError {
    fn from(err: GofError) -> Self {
        PowerLawError::GoodnessOfFit(err)
    }
}

impl From<PowerLawError> for SamplerError {
    fn from(err: PowerLawError) -> Self {
        match err {
            PowerLawError::Sampler(inner) => inner,
            other => SamplerError::Density { text: other.to_string() },
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<PowerLawError> for PyErr {
    fn from(err: PowerLawError) -> PyErr {
        PyValueError::new_err(format!("PowerLawError: {err}"))
    }
}
