//! zeta — Hurwitz zeta function ζ(α, q) with analytic ∂ζ/∂α.
//!
//! Purpose
//! -------
//! Provide the special-function primitive behind the discrete power-law
//! likelihood: `ζ(α, q) = Σ_{k≥0} (q+k)^(-α)` and its shape derivative,
//! accurate enough for likelihood values and for gradient-based sampling
//! across α from just above 1 to 100+ and q from 1 to 1000+.
//!
//! Key behaviors
//! -------------
//! - [`series`]: compensated direct partial sums of value and derivative.
//! - [`tail`]: Euler–Maclaurin remainder with up to 14 Bernoulli
//!   corrections and a first-omitted-term error estimate.
//! - [`evaluator`]: adaptive depth selection, anchored log-space
//!   recombination, and the public [`evaluate`] / [`hurwitz_zeta`] /
//!   [`HurwitzZeta`] surface.
//! - [`config`]: the validated [`TruncationConfig`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Domain: α > 0, α ≠ 1, q > 0, all finite. Violations are
//!   [`ZetaError`]s, never clamped.
//! - All functions are pure; nothing here allocates on the evaluation path,
//!   holds shared state, or logs.
//!
//! Downstream usage
//! ----------------
//! - `power_law` normalizes the pmf and differentiates the likelihood with
//!   [`HurwitzZeta`].
//! - `comparison` sweeps the evaluator against the `reference` oracles.

pub mod config;
pub mod errors;
pub mod evaluator;
pub mod series;
pub mod tail;
pub mod validation;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::config::TruncationConfig;
pub use self::errors::{ZetaError, ZetaResult};
pub use self::evaluator::{HurwitzZeta, ZetaEvaluation, evaluate, hurwitz_zeta};
pub use self::series::{PartialSums, partial_sums};
pub use self::tail::{TailEstimate, tail_estimate};
