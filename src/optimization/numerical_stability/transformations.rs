//! Numerically stable scalar transforms for the power-law shape.
//!
//! The sampler and the optimizer both work on an unconstrained `θ ∈ ℝ` and
//! map it to the shape through
//!
//! ```text
//! α = 1 + softplus(θ),   dα/dθ = logistic(θ)
//! ```
//!
//! so every `θ` is a valid shape and the pole at α = 1 is never reached.
//! Piecewise guards (`|x| > 20`) keep the `f64` arithmetic well conditioned
//! in both tails.

/// Eigenvalues of an information matrix at or below this are treated as zero.
pub const EIGEN_EPS: f64 = 1e-12;

const TAIL_CUTOFF: f64 = 20.0;

/// `ln(1 + e^x)` without overflow for large `x` or underflow to 0 for very
/// negative `x`.
pub fn safe_softplus(x: f64) -> f64 {
    if x > TAIL_CUTOFF { x + (-x).exp() } else { x.exp().ln_1p() }
}

/// Inverse of [`safe_softplus`] on `(0, ∞)`: `ln(e^x - 1)`.
///
/// Returns `-∞` at `x = 0` and NaN for negative input; callers validate the
/// domain first.
pub fn safe_softplus_inv(x: f64) -> f64 {
    if x > TAIL_CUTOFF { x + (-(-x).exp()).ln_1p() } else { x.exp_m1().ln() }
}

/// `1 / (1 + e^{-x})`, evaluated from the side that does not overflow.
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// `ln logistic(x) = -softplus(-x)`.
pub fn ln_logistic(x: f64) -> f64 {
    -safe_softplus(-x)
}

/// Shape from the unconstrained coordinate: `α = 1 + softplus(θ)`.
pub fn alpha_from_theta(theta: f64) -> f64 {
    1.0 + safe_softplus(theta)
}

/// Unconstrained coordinate for a shape `α > 1`.
pub fn theta_from_alpha(alpha: f64) -> f64 {
    safe_softplus_inv(alpha - 1.0)
}

/// Jacobian `dα/dθ = logistic(θ)`.
pub fn dalpha_dtheta(theta: f64) -> f64 {
    safe_logistic(theta)
}
