//! reference::hermite — Hermite-formula oracle with a native derivative.
//!
//! With `u = t/q` in Hermite's formula,
//!
//! ```text
//! ζ(α, q) = q^{-α} · B(α, q)
//! B       = 1/2 + q/(α-1) + 2q ∫₀^∞ sin(α·atan u) (1+u²)^{-α/2} / (e^{2πqu} - 1) du
//! ∂B/∂α   = -q/(α-1)² + 2q ∫₀^∞ [atan u · cos(α·atan u) - ½ ln(1+u²) · sin(α·atan u)]
//!                                (1+u²)^{-α/2} / (e^{2πqu} - 1) du
//! ∂ζ/∂α   = q^{-α} · (∂B/∂α - ln q · B)
//! ```
//!
//! Valid for every α > 0 except the pole. Applied to the peeled remainder
//! `ζ(α, q + 1)`.

use crate::reference::{
    ReferenceValue, ZetaOracle,
    errors::{ReferenceError, ReferenceResult},
    quadrature::{QuadratureOptions, QuadratureRule},
};

const NAME: &str = "hermite";
const TWO_PI: f64 = std::f64::consts::TAU;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HermiteOracle {
    quadrature: QuadratureOptions,
}

impl HermiteOracle {
    pub fn new(quadrature: QuadratureOptions) -> Self {
        Self { quadrature }
    }

    /// `(ζ(α, q), ∂ζ/∂α)` from the formula at offset `q` directly.
    pub fn zeta_and_derivative(&self, alpha: f64, q: f64) -> ReferenceResult<(f64, f64)> {
        let rule = QuadratureRule::global();
        let am1 = alpha - 1.0;

        let kernel = |u: f64| -> (f64, f64, f64) {
            let theta = u.atan();
            let ln_rho = (u * u).ln_1p();
            let weight = (-0.5 * alpha * ln_rho).exp() / (TWO_PI * q * u).exp_m1();
            (theta, ln_rho, weight)
        };

        let value_part = rule.integrate(
            |u, _| {
                let (theta, _, weight) = kernel(u);
                (alpha * theta).sin() * weight
            },
            &self.quadrature,
        )?;
        let derivative_part = rule.integrate(
            |u, _| {
                let (theta, ln_rho, weight) = kernel(u);
                let (sin, cos) = (alpha * theta).sin_cos();
                (theta * cos - 0.5 * ln_rho * sin) * weight
            },
            &self.quadrature,
        )?;

        let bracket = 0.5 + q / am1 + 2.0 * q * value_part.value;
        let bracket_d = -q / (am1 * am1) + 2.0 * q * derivative_part.value;
        let scale = q.powf(-alpha);
        Ok((scale * bracket, scale * (bracket_d - q.ln() * bracket)))
    }
}

impl ZetaOracle for HermiteOracle {
    fn name(&self) -> &'static str {
        NAME
    }

    fn evaluate(&self, alpha: f64, q: f64) -> ReferenceResult<ReferenceValue> {
        if !alpha.is_finite() || alpha <= 0.0 || alpha == 1.0 {
            return Err(ReferenceError::OutOfDomain {
                oracle: NAME,
                alpha,
                q,
                reason: "Hermite formula needs finite alpha > 0, alpha != 1.",
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

        let lead = q.powf(-alpha);
        let (rest, rest_d) = self.zeta_and_derivative(alpha, q + 1.0)?;
        Ok(ReferenceValue { value: lead + rest, derivative: -q.ln() * lead + rest_d })
    }
}
