//! inference — Laplace-approximation standard errors at the MLE.
//!
//! Purpose
//! -------
//! Convert a fitted log-likelihood into uncertainty: observed information
//! by finite differences of the analytic gradient, covariance by an
//! eigen-pseudoinverse, and classical standard errors. The power-law layer
//! maps the `θ`-scale result to the shape α with the delta method.
//!
//! Conventions
//! -----------
//! - Errors use the optimizer surface
//!   ([`OptResult`](crate::optimization::errors::OptResult)).
//! - Only classical (inverse-information) errors are provided.

pub mod hessian;

pub use self::hessian::{calc_standard_errors, covariance_from_information, observed_information};

pub mod prelude {
    pub use super::hessian::calc_standard_errors;
}
