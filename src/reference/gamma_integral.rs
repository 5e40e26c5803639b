//! reference::gamma_integral — Mellin-integral oracle.
//!
//! ```text
//! ζ(α, q) = Γ(α)^{-1} ∫₀^∞ t^{α-1} e^{-qt} / (1 - e^{-t}) dt,   α > 1
//! ```
//!
//! The integrand is evaluated in log space and normalized by `Γ(α)·q^{-α}`
//! (`statrs` log-gamma), so the quadrature sees an O(1) integrand for every
//! `(α, q)` on the validation grid. The derivative is a centered difference
//! of the value in α. The integrable `t^{α-2}` behavior at 0 limits the
//! usable domain to α >= [`MIN_ALPHA`].

use statrs::function::gamma::ln_gamma;

use crate::reference::{
    ReferenceValue, ZetaOracle, central_difference,
    errors::{ReferenceError, ReferenceResult},
    quadrature::{QuadratureOptions, QuadratureRule},
};

/// Smallest α (including the finite-difference stencil) the oracle accepts.
pub const MIN_ALPHA: f64 = 1.1;

/// Default centered-difference step in α.
pub const DEFAULT_STEP: f64 = 1e-5;

const NAME: &str = "gamma_integral";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammaIntegralOracle {
    quadrature: QuadratureOptions,
    step: f64,
}

impl Default for GammaIntegralOracle {
    fn default() -> Self {
        Self { quadrature: QuadratureOptions::default(), step: DEFAULT_STEP }
    }
}

impl GammaIntegralOracle {
    /// # Errors
    /// - [`ReferenceError::InvalidStep`] unless `0 < step <= 0.01`.
    pub fn new(quadrature: QuadratureOptions, step: f64) -> ReferenceResult<Self> {
        if !step.is_finite() || step <= 0.0 || step > 0.01 {
            return Err(ReferenceError::InvalidStep {
                step,
                reason: "Finite-difference step must lie in (0, 0.01].",
            });
        }
        Ok(Self { quadrature, step })
    }

    pub fn with_step(step: f64) -> ReferenceResult<Self> {
        Self::new(QuadratureOptions::default(), step)
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// `ln ζ(α, q)` straight from the Mellin integral (no peeling).
    pub fn ln_zeta(&self, alpha: f64, q: f64) -> ReferenceResult<f64> {
        let ln_scale = -alpha * q.ln();
        let ln_norm = ln_gamma(alpha) + ln_scale;
        let estimate = QuadratureRule::global().integrate_log(
            |t, ln_t| (alpha - 1.0) * ln_t - q * t - ln_one_minus_exp_neg(t) - ln_norm,
            &self.quadrature,
        )?;
        Ok(ln_scale + estimate.value.ln())
    }

    fn check_domain(&self, alpha: f64, q: f64) -> ReferenceResult<()> {
        if !alpha.is_finite() || alpha - self.step < MIN_ALPHA {
            return Err(ReferenceError::OutOfDomain {
                oracle: NAME,
                alpha,
                q,
                reason: "Mellin integral needs alpha - step >= 1.1.",
            });
        }
        if !q.is_finite() || q <= 0.0 {
            return Err(ReferenceError::OutOfDomain {
                oracle: NAME,
                alpha,
                q,
                reason: "Offset q must be finite and positive.",
            });
        }
        Ok(())
    }
}

impl ZetaOracle for GammaIntegralOracle {
    fn name(&self) -> &'static str {
        NAME
    }

    fn evaluate(&self, alpha: f64, q: f64) -> ReferenceResult<ReferenceValue> {
        self.check_domain(alpha, q)?;
        let shifted = q + 1.0;
        let remainder = |a: f64| -> ReferenceResult<f64> { Ok(self.ln_zeta(a, shifted)?.exp()) };

        let lead = q.powf(-alpha);
        let value = lead + remainder(alpha)?;
        let derivative = -q.ln() * lead + central_difference(remainder, alpha, self.step)?;
        Ok(ReferenceValue { value, derivative })
    }
}

/// `ln(1 - e^{-t})` without cancellation at either end.
fn ln_one_minus_exp_neg(t: f64) -> f64 {
    if t < std::f64::consts::LN_2 { (-(-t).exp_m1()).ln() } else { (-(-t).exp()).ln_1p() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Closed-form values ζ(2) and ζ(4, 1/2) = 15 ζ(4) and ζ'(2).
    // - Domain and step validation.
    //
    // They intentionally DO NOT cover:
    // - Agreement with the evaluator over the grid (integration tests).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The Mellin path reproduces classical values.
    //
    // Given
    // -----
    // - (α, q) = (2, 1) and (4, 1/2).
    //
    // Expect
    // ------
    // - ζ(2) = π²/6 and ζ(4, 1/2) = 15 π⁴/90 to 1e-11 relative.
    // - ζ'(2) to 1e-8 relative.
    fn mellin_oracle_matches_closed_forms() {
        // Arrange
        let oracle = GammaIntegralOracle::default();

        // Act
        let z2 = oracle.evaluate(2.0, 1.0).expect("in domain");
        let z4_half = oracle.evaluate(4.0, 0.5).expect("in domain");

        // Assert
        assert_relative_eq!(z2.value, PI * PI / 6.0, max_relative = 1e-11);
        assert_relative_eq!(z4_half.value, 15.0 * PI.powi(4) / 90.0, max_relative = 1e-11);
        assert_relative_eq!(z2.derivative, -0.937_548_254_315_843_8, max_relative = 1e-8);
    }

    #[test]
    // Purpose
    // -------
    // Inputs outside the integral's reliable domain are refused.
    //
    // Given
    // -----
    // - α = 1.05, q = -2, step = 0.
    //
    // Expect
    // ------
    // - OutOfDomain for the first two, InvalidStep for the last.
    fn domain_and_step_are_validated() {
        // Arrange
        let oracle = GammaIntegralOracle::default();

        // Act / Assert
        assert!(matches!(oracle.evaluate(1.05, 1.0), Err(ReferenceError::OutOfDomain { .. })));
        assert!(matches!(oracle.evaluate(2.0, -2.0), Err(ReferenceError::OutOfDomain { .. })));
        assert!(matches!(
            GammaIntegralOracle::with_step(0.0),
            Err(ReferenceError::InvalidStep { .. })
        ));
    }
}
