//! numerical_stability — guarded transforms shared by the MLE and HMC paths.
//!
//! Purpose
//! -------
//! Keep the unconstrained parameterization of the shape in one place. The
//! optimizer, the posterior density and the standard-error delta method all
//! go through these helpers, so a `θ` printed by one of them means the same
//! α everywhere.
//!
//! Conventions
//! -----------
//! - Pure `f64 → f64` functions, no logging or allocation.
//! - Domain checks (α > 1, finite inputs) happen in the model layer.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    EIGEN_EPS, alpha_from_theta, dalpha_dtheta, ln_logistic, safe_logistic, safe_softplus,
    safe_softplus_inv, theta_from_alpha,
};

pub mod prelude {
    pub use super::transformations::{
        alpha_from_theta, dalpha_dtheta, ln_logistic, safe_logistic, safe_softplus,
        theta_from_alpha,
    };
}
