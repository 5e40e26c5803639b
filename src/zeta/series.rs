//! zeta::series — direct partial sums of the Hurwitz series.
//!
//! Purpose
//! -------
//! Compute, in one pass over `k = 0..M-1`,
//!
//! ```text
//! S(M)  =  Σ (q+k)^(-α)
//! S'(M) = -Σ (q+k)^(-α) · ln(q+k)
//! ```
//!
//! reusing the power of each term for the derivative. Both sums use
//! Neumaier compensated accumulation.
//!
//! Conventions
//! -----------
//! - [`partial_sums`] is the unanchored, validated form.
//! - [`partial_sums_anchored`] scales every term by `a^α`, i.e. it sums
//!   `((q+k)/a)^(-α)`; the evaluator anchors at `a = q` so the first term is
//!   exactly one and nothing underflows for large `α·ln q`. The derivative
//!   keeps the true `ln(q+k)` weights, so `ζ' = a^(-α) · S'_anchored`.
//! - Terms are non-increasing; once a term underflows to zero the remaining
//!   ones cannot contribute and the loop stops.

use crate::zeta::{
    errors::ZetaResult,
    validation::{validate_alpha, validate_offset},
};

/// CompensatedSum — Neumaier running sum.
///
/// Carries the low-order bits lost by each addition in a separate
/// compensation term and folds them back in on [`CompensatedSum::total`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompensatedSum {
    sum: f64,
    comp: f64,
}

impl CompensatedSum {
    #[inline]
    pub fn add(&mut self, x: f64) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.comp += (self.sum - t) + x;
        } else {
            self.comp += (x - t) + self.sum;
        }
        self.sum = t;
    }

    #[inline]
    pub fn total(&self) -> f64 {
        self.sum + self.comp
    }
}

/// PartialSums — direct-sum contribution to value and derivative.
///
/// `derivative_abs` is `Σ (q+k)^(-α)·|ln(q+k)|`, the magnitude scale of the
/// derivative sum (the value terms are all positive, so `value` is its own
/// scale). `terms` is the number of terms requested.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartialSums {
    pub value: f64,
    pub derivative: f64,
    pub derivative_abs: f64,
    pub terms: usize,
}

/// Direct partial sums `S(M)` and `S'(M)` without anchoring.
///
/// # Errors
/// - [`crate::zeta::ZetaError::InvalidAlpha`] if `alpha` is not finite and
///   positive.
/// - [`crate::zeta::ZetaError::InvalidOffset`] if `q` is not finite and
///   positive.
pub fn partial_sums(alpha: f64, q: f64, terms: usize) -> ZetaResult<PartialSums> {
    validate_alpha(alpha)?;
    validate_offset(q)?;
    Ok(partial_sums_anchored(alpha, q, terms, 0.0))
}

/// Direct partial sums of `((q+k)/a)^(-α)` with `ln_anchor = ln a`.
pub fn partial_sums_anchored(alpha: f64, q: f64, terms: usize, ln_anchor: f64) -> PartialSums {
    let mut value = CompensatedSum::default();
    let mut derivative = CompensatedSum::default();
    let mut derivative_abs = 0.0;

    for k in 0..terms {
        let ln_x = (q + k as f64).ln();
        let t = (-alpha * (ln_x - ln_anchor)).exp();
        if t == 0.0 {
            break;
        }
        let weighted = t * ln_x;
        value.add(t);
        derivative.add(-weighted);
        derivative_abs += weighted.abs();
    }

    PartialSums { value: value.total(), derivative: derivative.total(), derivative_abs, terms }
}
