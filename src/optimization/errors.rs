//! optimization::errors — unified error surface for the MLE stack.
//!
//! Purpose
//! -------
//! Collect configuration, numerical, backend (argmin) and model failures of
//! the optimizer into one enum so callers of `maximize` and the standard
//! error helpers handle a single [`OptResult`].
//!
//! Conventions
//! -----------
//! - Validation variants carry the offending value and a `&'static str`
//!   reason.
//! - Argmin errors are mapped through `From<argmin::core::Error>`; an
//!   [`OptError`] that travelled through argmin as a boxed error is
//!   recovered unchanged.
//! - Power-law model failures arrive through `From<PowerLawError>`.

use argmin::core::{ArgminError, Error};
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

use crate::power_law::errors::PowerLawError;

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Gradient ----
    /// No analytic gradient; finite differences are used instead.
    GradientNotImplemented,

    GradientDimMismatch {
        expected: usize,
        found: usize,
    },

    InvalidGradient {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    // ---- MLEOptions ----
    InvalidTolGrad {
        tol: f64,
        reason: &'static str,
    },
    InvalidTolCost {
        tol: f64,
        reason: &'static str,
    },
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },
    NoTolerancesProvided,

    InvalidLineSearch {
        name: String,
        reason: &'static str,
    },

    InvalidLBFGSMem {
        mem: usize,
        reason: &'static str,
    },

    // ---- Objective ----
    NonFiniteCost {
        value: f64,
    },

    // ---- Outcome ----
    InvalidThetaHat {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    MissingThetaHat,

    /// L-BFGS stopped because its line search failed.
    LineSearchFailed {
        text: String,
    },

    // ---- Argmin ----
    InvalidParameter {
        text: String,
    },
    NotImplemented {
        text: String,
    },
    NotInitialized {
        text: String,
    },
    ConditionViolated {
        text: String,
    },
    CheckPointNotFound {
        text: String,
    },
    PotentialBug {
        text: String,
    },
    ImpossibleError {
        text: String,
    },
    BackendError {
        text: String,
    },

    // ---- Finite differences / information ----
    HessianDimMismatch {
        expected: usize,
        found: (usize, usize),
    },

    InvalidHessian {
        row: usize,
        col: usize,
        value: f64,
    },

    /// Observed information has no eigenvalue above the cutoff.
    SingularInformation {
        max_eigenvalue: f64,
    },

    // ---- Power-law model ----
    /// Shape α outside (1, ∞) or non-finite.
    InvalidShape {
        value: f64,
    },

    /// The zeta normalizer could not be evaluated.
    NormalizerFailed {
        text: String,
    },

    EmptyData,

    InvalidModelInput {
        text: String,
    },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Gradient ----
            OptError::GradientNotImplemented => write!(f, "Analytic gradient not implemented"),
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}. {reason}")
            }

            // ---- MLEOptions ----
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidTolCost { tol, reason } => {
                write!(f, "Invalid cost tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid max_iter {max_iter}: {reason}")
            }
            OptError::NoTolerancesProvided => {
                write!(f, "At least one of tol_grad, tol_cost or max_iter must be provided")
            }
            OptError::InvalidLineSearch { name, reason } => {
                write!(f, "Invalid line search '{name}': {reason}")
            }
            OptError::InvalidLBFGSMem { mem, reason } => {
                write!(f, "Invalid L-BFGS memory {mem}: {reason}")
            }

            // ---- Objective ----
            OptError::NonFiniteCost { value } => write!(f, "Objective is not finite: {value}"),

            // ---- Outcome ----
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid estimate at index {index}: {value}. {reason}")
            }
            OptError::MissingThetaHat => write!(f, "Optimizer returned no parameter estimate"),
            OptError::LineSearchFailed { text } => write!(f, "Line search failed: {text}"),

            // ---- Argmin ----
            OptError::InvalidParameter { text } => write!(f, "Invalid parameter: {text}"),
            OptError::NotImplemented { text } => write!(f, "Not implemented: {text}"),
            OptError::NotInitialized { text } => write!(f, "Not initialized: {text}"),
            OptError::ConditionViolated { text } => write!(f, "Condition violated: {text}"),
            OptError::CheckPointNotFound { text } => write!(f, "Checkpoint not found: {text}"),
            OptError::PotentialBug { text } => write!(f, "Potential bug: {text}"),
            OptError::ImpossibleError { text } => write!(f, "Impossible error: {text}"),
            OptError::BackendError { text } => write!(f, "Backend error: {text}"),

            // ---- Finite differences / information ----
            OptError::HessianDimMismatch { expected, found } => write!(
                f,
                "Hessian dimension mismatch: expected ({expected}, {expected}), found {found:?}"
            ),
            OptError::InvalidHessian { row, col, value } => {
                write!(f, "Invalid Hessian at ({row}, {col}): {value}, must be finite")
            }
            OptError::SingularInformation { max_eigenvalue } => write!(
                f,
                "Observed information is singular (largest eigenvalue {max_eigenvalue:e})"
            ),

            // ---- Power-law model ----
            OptError::InvalidShape { value } => {
                write!(f, "Invalid shape alpha = {value}: must be finite and > 1")
            }
            OptError::NormalizerFailed { text } => write!(f, "Zeta normalizer failed: {text}"),
            OptError::EmptyData => write!(f, "Frequency table is empty"),
            OptError::InvalidModelInput { text } => write!(f, "Invalid model input: {text}"),

            // ---- Fallback ----
            OptError::UnknownError => write!(f, "Unknown error"),
        }
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        let err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match err.downcast::<ArgminError>() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

impl From<PowerLawError> for OptError {
    fn from(err: PowerLawError) -> Self {
        match err {
            PowerLawError::InvalidShape { value, .. } => OptError::InvalidShape { value },
            PowerLawError::EmptyData => OptError::EmptyData,
            PowerLawError::Zeta(zeta_err) => {
                OptError::NormalizerFailed { text: zeta_err.to_string() }
            }
            PowerLawError::Fit(opt_err) => opt_err,
            other => OptError::InvalidModelInput { text: other.to_string() },
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<OptError> for PyErr {
    fn from(err: OptError) -> PyErr {
        PyValueError::new_err(format!("OptError: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zeta::ZetaError;

    #[test]
    // Purpose
    // -------
    // An OptError boxed into argmin's error type comes back unchanged, and
    // argmin's own errors map to their wrappers.
    //
    // Given
    // -----
    // - `OptError::EmptyData` and `ArgminError::NotInitialized` converted
    //   into `argmin::core::Error`.
    //
    // Expect
    // ------
    // - EmptyData and NotInitialized { text } respectively.
    fn argmin_round_trip_preserves_variants() {
        // Arrange
        let boxed_opt: Error = OptError::EmptyData.into();
        let boxed_argmin: Error = ArgminError::NotInitialized { text: "state".into() }.into();

        // Act
        let opt = OptError::from(boxed_opt);
        let argmin = OptError::from(boxed_argmin);

        // Assert
        assert_eq!(opt, OptError::EmptyData);
        assert_eq!(argmin, OptError::NotInitialized { text: "state".into() });
    }

    #[test]
    // Purpose
    // -------
    // Model errors map onto the optimizer surface.
    //
    // Given
    // -----
    // - InvalidShape and a wrapped zeta pole error.
    //
    // Expect
    // ------
    // - InvalidShape { value } and NormalizerFailed with the zeta message.
    fn power_law_errors_map_to_opt_errors() {
        // Arrange
        let shape = PowerLawError::InvalidShape { value: 0.5, reason: "alpha must exceed 1" };
        let zeta = PowerLawError::Zeta(ZetaError::Pole { alpha: 1.0 });

        // Act / Assert
        assert_eq!(OptError::from(shape), OptError::InvalidShape { value: 0.5 });
        assert!(matches!(OptError::from(zeta), OptError::NormalizerFailed { .. }));
    }
}
