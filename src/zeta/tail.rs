//! zeta::tail — Euler–Maclaurin remainder of the Hurwitz series.
//!
//! Purpose
//! -------
//! Approximate the tail `Σ_{k≥0} (N+k)^(-α)` at a shift `N = q + M` together
//! with its α-derivative:
//!
//! ```text
//! Tail(N) ≈ N^(1-α)/(α-1) + N^(-α)/2
//!         + Σ_{j=1}^{T} B_{2j}/(2j)! · α(α+1)…(α+2j-2) · N^(-α-2j+1)
//! ```
//!
//! The derivative differentiates each term: the rising factorial by the
//! product rule, the powers of `N` through `-ln N`.
//!
//! Key behaviors
//! -------------
//! - [`tail_estimate`] is the checked entry point: it rejects α inside the
//!   near-pole band with [`ZetaError::NearPole`].
//! - [`tail_estimate_anchored`] is the unchecked best-effort form used by the
//!   evaluator. Every term carries a common factor `a^(-α)` removed, so large
//!   `α` with large `N` stays representable.
//! - Both report the first omitted correction (`j = T + 1`) as the
//!   truncation-error estimate for value and derivative.
//!
//! Invariants & assumptions
//! ------------------------
//! - `N > 0`, `α > 0`, `α != 1`, `1 <= T <= MAX_TAIL_ORDER`.
//! - The Bernoulli table holds `B_{2j}/(2j)!` for `j = 1..=15`.

use crate::zeta::{
    errors::{ZetaError, ZetaResult},
    series::CompensatedSum,
    validation::{validate_alpha, validate_offset},
};

/// Largest supported number of Bernoulli corrections.
pub const MAX_TAIL_ORDER: usize = 14;

/// `B_{2j} / (2j)!` for `j = 1..=15`.
pub(crate) const BERNOULLI_RATIOS: [f64; MAX_TAIL_ORDER + 1] = [
    1.0 / 6.0 / 2.0,
    -1.0 / 30.0 / 24.0,
    1.0 / 42.0 / 720.0,
    -1.0 / 30.0 / 40_320.0,
    5.0 / 66.0 / 3_628_800.0,
    -691.0 / 2_730.0 / 479_001_600.0,
    7.0 / 6.0 / 87_178_291_200.0,
    -3_617.0 / 510.0 / 20_922_789_888_000.0,
    43_867.0 / 798.0 / 6_402_373_705_728_000.0,
    -174_611.0 / 330.0 / 2_432_902_008_176_640_000.0,
    854_513.0 / 138.0 / 1_124_000_727_777_607_680_000.0,
    -236_364_091.0 / 2_730.0 / 620_448_401_733_239_439_360_000.0,
    8_553_103.0 / 6.0 / 403_291_461_126_605_635_584_000_000.0,
    -23_749_461_029.0 / 870.0 / 304_888_344_611_713_860_501_504_000_000.0,
    8_615_841_276_005.0 / 14_322.0 / 265_252_859_812_191_058_636_308_480_000_000.0,
];

/// TailEstimate — Euler–Maclaurin tail value, derivative and error estimate.
///
/// All fields share the anchor scaling of the call that produced them.
/// `value_abs` / `derivative_abs` sum the magnitudes of the individual
/// pieces; they are the scales the evaluator measures relative error
/// against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TailEstimate {
    pub value: f64,
    pub derivative: f64,
    pub value_abs: f64,
    pub derivative_abs: f64,
    pub error_value: f64,
    pub error_derivative: f64,
}

/// Whether `alpha` falls inside the near-pole band `|α - 1| < pole_eps`.
#[inline]
pub fn is_near_pole(alpha: f64, pole_eps: f64) -> bool {
    (alpha - 1.0).abs() < pole_eps
}

/// Checked tail at shift `N`, without anchoring.
///
/// # Errors
/// - [`ZetaError::InvalidAlpha`] / [`ZetaError::InvalidOffset`] on domain
///   violations.
/// - [`ZetaError::InvalidTailOrder`] if `order` is outside
///   `1..=MAX_TAIL_ORDER`.
/// - [`ZetaError::NearPole`] if `|α - 1| < pole_eps`.
pub fn tail_estimate(
    alpha: f64, shift: f64, order: usize, pole_eps: f64,
) -> ZetaResult<TailEstimate> {
    validate_alpha(alpha)?;
    validate_offset(shift)?;
    if order == 0 || order > MAX_TAIL_ORDER {
        return Err(ZetaError::InvalidTailOrder {
            order,
            reason: "Tail order must lie in 1..=14.",
        });
    }
    if is_near_pole(alpha, pole_eps) {
        return Err(ZetaError::NearPole {
            alpha,
            distance: (alpha - 1.0).abs(),
            threshold: pole_eps,
        });
    }
    Ok(tail_estimate_anchored(alpha, shift, 0.0, order))
}

/// Unchecked tail at shift `N`, scaled by `a^α` where `ln_anchor = ln a`.
///
/// Inputs are trusted: the evaluator validates `(α, q)` and the order once
/// per call. Near the pole the leading term is large but finite.
pub fn tail_estimate_anchored(
    alpha: f64, shift: f64, ln_anchor: f64, order: usize,
) -> TailEstimate {
    let ln_n = shift.ln();
    // (N / a)^(-α)
    let w = (-alpha * (ln_n - ln_anchor)).exp();
    let am1 = alpha - 1.0;

    let lead = shift * w / am1;
    let lead_d = -lead * (ln_n + 1.0 / am1);
    let half = 0.5 * w;
    let half_d = -half * ln_n;

    let mut value = CompensatedSum::default();
    let mut derivative = CompensatedSum::default();
    value.add(lead);
    value.add(half);
    derivative.add(lead_d);
    derivative.add(half_d);
    let mut value_abs = lead.abs() + half;
    let mut derivative_abs = lead_d.abs() + half_d.abs();

    let inv_n2 = (shift * shift).recip();
    let mut rising = alpha;
    let mut rising_d = 1.0;
    let mut power = w / shift;

    for (j, &coeff) in BERNOULLI_RATIOS[..order].iter().enumerate() {
        let term = coeff * rising * power;
        let term_d = coeff * power * (rising_d - rising * ln_n);
        value.add(term);
        derivative.add(term_d);
        value_abs += term.abs();
        derivative_abs += term_d.abs();

        // R_{j+1} = R_j (α + 2j - 1)(α + 2j) with 1-based j.
        let a = alpha + (2 * j + 1) as f64;
        let b = alpha + (2 * j + 2) as f64;
        rising_d = rising_d * a * b + rising * (a + b);
        rising *= a * b;
        power *= inv_n2;
    }

    // First omitted correction; the derivative bound takes |R'| + R|ln N|.
    let coeff = BERNOULLI_RATIOS[order].abs();
    let error_value = coeff * rising * power.abs();
    let error_derivative = coeff * power.abs() * (rising_d.abs() + rising * ln_n.abs());

    TailEstimate {
        value: value.total(),
        derivative: derivative.total(),
        value_abs,
        derivative_abs,
        error_value,
        error_derivative,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zeta::series::partial_sums;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Direct sum + tail reproducing ζ(2) and ζ'(2).
    // - The first-omitted-term estimate bounding the actual truncation error.
    // - The checked entry point's near-pole and order guards.
    //
    // They intentionally DO NOT cover:
    // - Depth selection and anchoring (see `evaluator`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // S(M) + Tail(q + M) must reproduce the full series.
    //
    // Given
    // -----
    // - α = 2, q = 1, M = 10, T = 6.
    //
    // Expect
    // ------
    // - Value equals π²/6 and derivative equals ζ'(2) to 1e-13 relative.
    fn sum_plus_tail_reproduces_zeta_two() {
        // Act
        let direct = partial_sums(2.0, 1.0, 10).expect("valid inputs");
        let tail = tail_estimate(2.0, 11.0, 6, 1e-6).expect("away from pole");

        // Assert
        assert_relative_eq!(direct.value + tail.value, PI * PI / 6.0, max_relative = 1e-13);
        assert_relative_eq!(
            direct.derivative + tail.derivative,
            -0.937_548_254_315_843_8,
            max_relative = 1e-13
        );
    }

    #[test]
    // Purpose
    // -------
    // The omitted-term estimate tracks the actual error of a short tail.
    //
    // Given
    // -----
    // - α = 2, q = 1, M = 4, T = 2 (deliberately coarse).
    //
    // Expect
    // ------
    // - Actual error is nonzero and at most twice `error_value`.
    // - Raising T to 8 shrinks `error_value`.
    fn omitted_term_estimate_bounds_actual_error() {
        // Arrange
        let exact = PI * PI / 6.0;
        let direct = partial_sums(2.0, 1.0, 4).expect("valid inputs");

        // Act
        let coarse = tail_estimate(2.0, 5.0, 2, 1e-6).expect("away from pole");
        let fine = tail_estimate(2.0, 5.0, 8, 1e-6).expect("away from pole");
        let actual = (direct.value + coarse.value - exact).abs();

        // Assert
        assert!(actual > 0.0);
        assert!(actual <= 2.0 * coarse.error_value, "actual {actual} vs {}", coarse.error_value);
        assert!(fine.error_value < coarse.error_value);
    }

    #[test]
    // Purpose
    // -------
    // Guards on the checked entry point.
    //
    // Given
    // -----
    // - α = 1 + 1e-8 with pole_eps = 1e-6; order 0 and 15.
    //
    // Expect
    // ------
    // - NearPole for the first, InvalidTailOrder for the others.
    // - The unchecked form still returns a finite estimate near the pole.
    fn checked_tail_rejects_near_pole_and_bad_order() {
        // Act
        let near = tail_estimate(1.0 + 1e-8, 10.0, 6, 1e-6);
        let zero = tail_estimate(2.0, 10.0, 0, 1e-6);
        let big = tail_estimate(2.0, 10.0, 15, 1e-6);
        let best_effort = tail_estimate_anchored(1.0 + 1e-8, 10.0, 0.0, 6);

        // Assert
        assert!(matches!(near, Err(ZetaError::NearPole { .. })));
        assert!(matches!(zero, Err(ZetaError::InvalidTailOrder { order: 0, .. })));
        assert!(matches!(big, Err(ZetaError::InvalidTailOrder { order: 15, .. })));
        assert!(best_effort.value.is_finite() && best_effort.derivative.is_finite());
    }
}
