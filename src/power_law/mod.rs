//! power_law — discrete power-law harness around the zeta evaluator.
//!
//! Purpose
//! -------
//! Exercise the evaluator where it matters: as the normalizer and gradient
//! source of a discrete power-law (generalized Zipf) model with known
//! minimum support point `y_min`.
//!
//! Key behaviors
//! -------------
//! - [`DiscretePowerLaw`]: pmf, survival function and inversion sampling,
//!   optionally truncated at an upper bound.
//! - [`SyntheticDataset`] / [`FrequencyTable`]: raw draws and their
//!   `(value, count)` aggregation, the sampler's input format.
//! - [`PowerLawLikelihood`], [`PowerLawPosterior`], [`fit_mle`]: the
//!   likelihood in the unconstrained `θ` parameterization, the Gamma-prior
//!   posterior density and the L-BFGS maximum likelihood fit.
//! - [`CompiledModel`]: the process-wide posterior program that implements
//!   [`PosteriorSampler`](crate::sampler::PosteriorSampler).
//! - [`Experiment`]: recovery of a known α across several offsets, with a
//!   CSV report.
//!
//! Invariants & assumptions
//! ------------------------
//! - `α > 1`, `y_min >= 1`; both are checked on construction.
//! - Distribution, likelihood and posterior normalize with the same
//!   [`HurwitzZeta`](crate::zeta::HurwitzZeta) configuration.
//! - Everything is deterministic for a fixed seed.

pub mod compiled;
pub mod data;
pub mod distribution;
pub mod errors;
pub mod experiment;
pub mod posterior;
pub mod prior;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::compiled::{CompiledModel, PosteriorFit};
pub use self::data::{FrequencyTable, SyntheticDataset};
pub use self::distribution::{DIRECT_SUM_LIMIT, DiscretePowerLaw, UNTRUNCATED_CAP};
pub use self::errors::{PowerLawError, PowerLawResult};
pub use self::experiment::{Experiment, ExperimentOptions, ExperimentReport, ExperimentRow};
pub use self::posterior::{MleFit, PowerLawLikelihood, PowerLawPosterior, fit_mle};
pub use self::prior::{DEFAULT_PRIOR_RATE, DEFAULT_PRIOR_SHAPE, GammaPrior};

pub mod prelude {
    pub use super::compiled::CompiledModel;
    pub use super::data::{FrequencyTable, SyntheticDataset};
    pub use super::distribution::DiscretePowerLaw;
    pub use super::errors::{PowerLawError, PowerLawResult};
    pub use super::experiment::{Experiment, ExperimentOptions};
    pub use super::prior::GammaPrior;
}
