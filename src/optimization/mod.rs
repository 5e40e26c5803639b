//! optimization — MLE stack, shape transforms and the optimizer error surface.
//!
//! Purpose
//! -------
//! Provide the frequentist side of the power-law fit: an argmin L-BFGS
//! maximizer over an unconstrained parameter, the guarded transforms that
//! map that parameter to the shape α, and a single [`OptError`] /
//! [`OptResult`] surface.
//!
//! Key behaviors
//! -------------
//! - `loglik_optimizer`: [`maximize`](loglik_optimizer::maximize) for any
//!   [`LogLikelihood`](loglik_optimizer::LogLikelihood), plus finite-difference
//!   Hessians.
//! - `numerical_stability`: `α = 1 + softplus(θ)` and friends, shared with
//!   the posterior density.
//!
//! Conventions
//! -----------
//! - Solvers minimize `c(θ) = -ℓ(θ)`; everything user-facing is stated in
//!   terms of `ℓ`.
//! - No logging beyond optional `debug!` events when `verbose` is set.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

pub use self::errors::{OptError, OptResult};

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
