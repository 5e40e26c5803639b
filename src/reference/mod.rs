//! reference — independent high-accuracy paths for validating the evaluator.
//!
//! Purpose
//! -------
//! Put two reference computations of `(ζ(α,q), ∂ζ/∂α)` behind one trait so
//! the validation harness can diff the evaluator against each of them.
//!
//! Key behaviors
//! -------------
//! - [`GammaIntegralOracle`]: value from the Mellin integral
//!   `Γ(α)^{-1} ∫ t^{α-1} e^{-qt} / (1 - e^{-t}) dt`; derivative by a centered
//!   difference in α with a caller-chosen step.
//! - [`HermiteOracle`]: value and native derivative from Hermite's integral
//!   formula, differentiated under the integral sign.
//! - Both peel the leading term `q^(-α)` off analytically and integrate the
//!   remainder `ζ(α, q + 1)`, whose offset is at least one; the remainder's
//!   derivative then has a single sign and no cancellation.
//! - Both share the cached exp-sinh rule in [`quadrature`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Reference only: nothing in the sampling path depends on this module.
//! - Oracles are stateless configuration (`Send + Sync`).

pub mod errors;
pub mod gamma_integral;
pub mod hermite;
pub mod quadrature;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::errors::{ReferenceError, ReferenceResult};
pub use self::gamma_integral::GammaIntegralOracle;
pub use self::hermite::HermiteOracle;
pub use self::quadrature::{QuadratureEstimate, QuadratureOptions, QuadratureRule};

/// ReferenceValue — oracle output for one `(α, q)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceValue {
    pub value: f64,
    pub derivative: f64,
}

/// ZetaOracle — `(α, q) → (ζ, ∂ζ/∂α)` reference interface.
pub trait ZetaOracle: Send + Sync {
    /// Short identifier used in comparison records and reports.
    fn name(&self) -> &'static str;

    fn evaluate(&self, alpha: f64, q: f64) -> ReferenceResult<ReferenceValue>;
}

/// Centered difference `(f(x + h) - f(x - h)) / 2h`.
///
/// # Errors
/// - [`ReferenceError::InvalidStep`] if `h` is not finite and positive.
/// - Any error returned by `f`.
pub fn central_difference<F>(f: F, x: f64, h: f64) -> ReferenceResult<f64>
where
    F: Fn(f64) -> ReferenceResult<f64>,
{
    if !h.is_finite() || h <= 0.0 {
        return Err(ReferenceError::InvalidStep {
            step: h,
            reason: "Step must be finite and positive.",
        });
    }
    Ok((f(x + h)? - f(x - h)?) / (2.0 * h))
}
