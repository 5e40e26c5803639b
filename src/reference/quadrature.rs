//! reference::quadrature — exp-sinh (double-exponential) rule on [0, ∞).
//!
//! Purpose
//! -------
//! Integrate smooth integrands on the half line, including integrable
//! endpoint singularities at 0 and exponential decay at ∞, with the
//! substitution
//!
//! ```text
//! x(t) = exp(π/2 · sinh t),   dx/dt = π/2 · cosh t · x(t)
//! ```
//!
//! followed by the trapezoidal rule in `t`. Each refinement level halves
//! the step and only evaluates the new (odd) nodes.
//!
//! Key behaviors
//! -------------
//! - Nodes and weights are computed once per level and cached for the
//!   process lifetime in per-level `OnceLock`s behind [`QuadratureRule::global`].
//! - [`QuadratureRule::integrate`] takes the integrand value directly;
//!   [`QuadratureRule::integrate_log`] takes `ln f` for positive integrands
//!   and folds the Jacobian in log space.
//! - Convergence: successive levels agree to `rel_tol` times the L1 norm of
//!   the integrand after at least `min_level` levels.
//!
//! Conventions
//! -----------
//! - The `t` range is `[-T_LOWER, T_UPPER]`, i.e. `x` spans roughly
//!   `[1e-227, 1e137]`; contributions outside are assumed negligible.

use std::sync::OnceLock;

use crate::{
    reference::errors::{ReferenceError, ReferenceResult},
    zeta::series::CompensatedSum,
};

const T_LOWER: f64 = 6.5;
const T_UPPER: f64 = 6.0;
const BASE_STEP: f64 = 0.5;
const HALF_PI: f64 = std::f64::consts::FRAC_PI_2;

/// Deepest refinement level the rule will build.
pub const MAX_LEVEL: usize = 12;

/// QuadratureOptions — refinement and stopping policy.
///
/// - `rel_tol`: stop when `|I_l - I_{l-1}| <= rel_tol · ‖f‖₁`.
/// - `min_level`: never stop before this level.
/// - `max_level`: give up after this level (`<= MAX_LEVEL`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureOptions {
    pub rel_tol: f64,
    pub min_level: usize,
    pub max_level: usize,
}

impl QuadratureOptions {
    pub fn new(rel_tol: f64, min_level: usize, max_level: usize) -> ReferenceResult<Self> {
        if !rel_tol.is_finite() || rel_tol <= 0.0 {
            return Err(ReferenceError::InvalidQuadratureOptions {
                reason: "Relative tolerance must be finite and positive.",
            });
        }
        if min_level == 0 || min_level > max_level {
            return Err(ReferenceError::InvalidQuadratureOptions {
                reason: "Levels must satisfy 1 <= min_level <= max_level.",
            });
        }
        if max_level > MAX_LEVEL {
            return Err(ReferenceError::InvalidQuadratureOptions {
                reason: "max_level exceeds the deepest supported level (12).",
            });
        }
        Ok(Self { rel_tol, min_level, max_level })
    }
}

impl Default for QuadratureOptions {
    fn default() -> Self {
        Self { rel_tol: 1e-12, min_level: 4, max_level: MAX_LEVEL }
    }
}

/// QuadratureEstimate — integral, its L1 norm, and the last level change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureEstimate {
    pub value: f64,
    pub l1_norm: f64,
    pub error: f64,
    pub levels: usize,
    pub evaluations: usize,
}

#[derive(Debug, Clone, Copy)]
struct Node {
    x: f64,
    ln_x: f64,
    jacobian: f64,
    ln_jacobian: f64,
}

/// QuadratureRule — lazily built exp-sinh node table.
#[derive(Debug, Default)]
pub struct QuadratureRule {
    levels: [OnceLock<Vec<Node>>; MAX_LEVEL + 1],
}

static GLOBAL_RULE: OnceLock<QuadratureRule> = OnceLock::new();

impl QuadratureRule {
    /// Process-wide rule shared by every oracle.
    pub fn global() -> &'static QuadratureRule {
        GLOBAL_RULE.get_or_init(QuadratureRule::default)
    }

    /// Integrate `f(x, ln x)` over `[0, ∞)`.
    ///
    /// # Errors
    /// - [`ReferenceError::NonFiniteIntegrand`] if `f` returns NaN or ±∞.
    /// - [`ReferenceError::QuadratureNotConverged`] if `max_level` is reached
    ///   without meeting the tolerance.
    pub fn integrate<F>(
        &self, f: F, opts: &QuadratureOptions,
    ) -> ReferenceResult<QuadratureEstimate>
    where
        F: Fn(f64, f64) -> f64,
    {
        self.refine(opts, |node| {
            let fx = f(node.x, node.ln_x);
            if !fx.is_finite() {
                return Err(ReferenceError::NonFiniteIntegrand { x: node.x });
            }
            // Far-tail nodes pair a zero integrand with a large Jacobian.
            Ok(if fx == 0.0 { 0.0 } else { fx * node.jacobian })
        })
    }

    /// Integrate a positive integrand given as `ln f(x, ln x)`.
    ///
    /// `ln f = -∞` is a valid zero contribution; `+∞` and NaN are errors.
    pub fn integrate_log<F>(
        &self, ln_f: F, opts: &QuadratureOptions,
    ) -> ReferenceResult<QuadratureEstimate>
    where
        F: Fn(f64, f64) -> f64,
    {
        self.refine(opts, |node| {
            let lf = ln_f(node.x, node.ln_x);
            if lf.is_nan() || lf == f64::INFINITY {
                return Err(ReferenceError::NonFiniteIntegrand { x: node.x });
            }
            Ok((lf + node.ln_jacobian).exp())
        })
    }

    fn refine<G>(
        &self, opts: &QuadratureOptions, weighted: G,
    ) -> ReferenceResult<QuadratureEstimate>
    where
        G: Fn(&Node) -> ReferenceResult<f64>,
    {
        let max_level = opts.max_level.min(MAX_LEVEL);
        let mut sum = CompensatedSum::default();
        let mut l1 = 0.0;
        let mut evaluations = 0;
        let mut previous: Option<f64> = None;
        let mut last_error = f64::INFINITY;

        for level in 0..=max_level {
            let nodes = self.level(level);
            for node in nodes {
                let w = weighted(node)?;
                if !w.is_finite() {
                    return Err(ReferenceError::NonFiniteIntegrand { x: node.x });
                }
                sum.add(w);
                l1 += w.abs();
            }
            evaluations += nodes.len();

            let step = BASE_STEP / (1u64 << level) as f64;
            let estimate = step * sum.total();
            let l1_norm = step * l1;
            if let Some(prev) = previous {
                last_error = (estimate - prev).abs();
                if level >= opts.min_level && last_error <= opts.rel_tol * l1_norm {
                    return Ok(QuadratureEstimate {
                        value: estimate,
                        l1_norm,
                        error: last_error,
                        levels: level,
                        evaluations,
                    });
                }
            }
            previous = Some(estimate);
        }

        Err(ReferenceError::QuadratureNotConverged {
            estimate: previous.unwrap_or(f64::NAN),
            error: last_error,
            levels: max_level,
        })
    }

    fn level(&self, level: usize) -> &[Node] {
        self.levels[level].get_or_init(|| build_level(level))
    }
}

/// Nodes first appearing at `level`: every multiple of the base step at
/// level 0, the odd multiples of `BASE_STEP / 2^level` afterwards.
fn build_level(level: usize) -> Vec<Node> {
    let per_base = 1i64 << level;
    let lo = -((T_LOWER / BASE_STEP) as i64) * per_base;
    let hi = ((T_UPPER / BASE_STEP) as i64) * per_base;
    let step = BASE_STEP / per_base as f64;

    (lo..=hi)
        .filter(|m| level == 0 || m.rem_euclid(2) == 1)
        .map(|m| {
            let t = m as f64 * step;
            let ln_x = HALF_PI * t.sinh();
            let cosh = t.cosh();
            let x = ln_x.exp();
            Node {
                x,
                ln_x,
                jacobian: HALF_PI * cosh * x,
                ln_jacobian: (HALF_PI * cosh).ln() + ln_x,
            }
        })
        .collect()
}
