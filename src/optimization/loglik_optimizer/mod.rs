//! loglik_optimizer — argmin-backed maximum likelihood.
//!
//! Purpose
//! -------
//! Maximize a model's log-likelihood `ℓ(θ)` with L-BFGS and hand back a
//! validated [`OptimOutcome`]. The power-law layer uses it for the MLE
//! warm start of the sampler and for the Laplace standard error.
//!
//! Key behaviors
//! -------------
//! - [`maximize`] validates `θ₀`, wraps the model in an argmin problem
//!   (cost `-ℓ`), builds the solver from [`MLEOptions`] and runs it.
//! - Models without an analytic gradient get central (then forward) finite
//!   differences automatically.
//! - [`finite_diff::compute_hessian`] differentiates an analytic gradient for
//!   observed-information standard errors.
//!
//! Conventions
//! -----------
//! - All failures are [`OptError`](crate::optimization::errors::OptError)s;
//!   model errors raised inside argmin come back unchanged.

pub mod adapter;
pub mod finite_diff;
pub mod solver;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::solver::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, HZ_MAX_STEP, Hessian, Theta};

pub mod prelude {
    pub use super::solver::maximize;
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
