//! zeta::config — truncation policy for the series + tail evaluator.
//!
//! Purpose
//! -------
//! Hold the knobs that decide how many direct terms are summed before the
//! Euler–Maclaurin tail takes over, how many Bernoulli corrections the tail
//! carries, and what relative error the evaluator aims for.
//!
//! Invariants & assumptions
//! ------------------------
//! - `min_terms <= max_terms` and `max_terms >= 1`.
//! - `1 <= tail_order <= MAX_TAIL_ORDER` (one more Bernoulli coefficient is
//!   needed for the omitted-term error estimate).
//! - `rel_tol` is finite and lies in `(0, 1)`; `pole_eps` is finite and `> 0`.
//!
//! Conventions
//! -----------
//! - The config is plain data (`Copy`), validated once on construction and
//!   never mutated by the evaluator. Evaluations are a pure function of
//!   `(α, q, config)`.

use crate::zeta::{
    errors::{ZetaError, ZetaResult},
    tail::MAX_TAIL_ORDER,
};

/// Default floor on the number of direct terms.
pub const DEFAULT_MIN_TERMS: usize = 2;

/// Default ceiling on the number of direct terms.
pub const DEFAULT_MAX_TERMS: usize = 100_000;

/// Default number of Bernoulli corrections in the tail.
pub const DEFAULT_TAIL_ORDER: usize = 6;

/// Default target relative truncation error for value and derivative.
pub const DEFAULT_REL_TOL: f64 = 1e-13;

/// Default half-width of the near-pole band around α = 1.
pub const DEFAULT_POLE_EPS: f64 = 1e-6;

/// TruncationConfig — evaluator truncation policy.
///
/// Fields
/// ------
/// - `min_terms`: floor on the direct-sum depth `M`.
/// - `max_terms`: budget on `M`; exceeding it yields `converged = false`.
/// - `tail_order`: number `T` of Bernoulli corrections in the tail.
/// - `rel_tol`: target relative truncation error.
/// - `pole_eps`: `|α - 1| < pole_eps` is reported as near-pole.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TruncationConfig {
    pub min_terms: usize,
    pub max_terms: usize,
    pub tail_order: usize,
    pub rel_tol: f64,
    pub pole_eps: f64,
}

impl TruncationConfig {
    /// Construct a validated configuration.
    ///
    /// # Errors
    /// - [`ZetaError::InvalidTermBudget`] if `max_terms == 0` or
    ///   `min_terms > max_terms`.
    /// - [`ZetaError::InvalidTailOrder`] if `tail_order` is outside
    ///   `1..=MAX_TAIL_ORDER`.
    /// - [`ZetaError::InvalidRelTol`] / [`ZetaError::InvalidPoleEps`] for
    ///   non-finite or out-of-range tolerances.
    pub fn new(
        min_terms: usize, max_terms: usize, tail_order: usize, rel_tol: f64, pole_eps: f64,
    ) -> ZetaResult<Self> {
        let config = Self { min_terms, max_terms, tail_order, rel_tol, pole_eps };
        config.validate()?;
        Ok(config)
    }

    /// Re-check the invariants; fields are public, so the evaluator calls
    /// this once per evaluation.
    pub fn validate(&self) -> ZetaResult<()> {
        let Self { min_terms, max_terms, tail_order, rel_tol, pole_eps } = *self;
        if max_terms == 0 {
            return Err(ZetaError::InvalidTermBudget {
                min_terms,
                max_terms,
                reason: "Term budget must be at least one.",
            });
        }
        if min_terms > max_terms {
            return Err(ZetaError::InvalidTermBudget {
                min_terms,
                max_terms,
                reason: "Minimum number of terms exceeds the budget.",
            });
        }
        if tail_order == 0 || tail_order > MAX_TAIL_ORDER {
            return Err(ZetaError::InvalidTailOrder {
                order: tail_order,
                reason: "Tail order must lie in 1..=14.",
            });
        }
        if !rel_tol.is_finite() || rel_tol <= 0.0 || rel_tol >= 1.0 {
            return Err(ZetaError::InvalidRelTol {
                tol: rel_tol,
                reason: "Relative tolerance must be finite and in (0, 1).",
            });
        }
        if !pole_eps.is_finite() || pole_eps <= 0.0 {
            return Err(ZetaError::InvalidPoleEps {
                eps: pole_eps,
                reason: "Near-pole threshold must be finite and positive.",
            });
        }
        Ok(())
    }
}

impl Default for TruncationConfig {
    fn default() -> Self {
        Self {
            min_terms: DEFAULT_MIN_TERMS,
            max_terms: DEFAULT_MAX_TERMS,
            tail_order: DEFAULT_TAIL_ORDER,
            rel_tol: DEFAULT_REL_TOL,
            pole_eps: DEFAULT_POLE_EPS,
        }
    }
}
