//! sampler — the posterior-sampler boundary and its HMC implementation.
//!
//! Purpose
//! -------
//! Separate "what is sampled" from "how it is sampled". Models expose a 1-D
//! unconstrained log density through [`LogDensity`]; whole-model samplers
//! accept aggregated data through [`PosteriorSampler`] and return
//! [`PosteriorDraws`].
//!
//! Key behaviors
//! -------------
//! - [`Hmc`]: static-trajectory HMC with dual-averaging step size and
//!   windowed metric adaptation, chains run in parallel with rayon.
//! - [`PosteriorDraws::summary`]: mean, sd, 5/50/95% quantiles, split-R̂ and
//!   multi-chain ESS.
//!
//! Invariants & assumptions
//! ------------------------
//! - Densities are pure: the same `θ` always yields the same value, and
//!   implementations share no mutable state across chains.
//! - Divergent transitions are counted, never raised.

pub mod adaptation;
pub mod diagnostics;
pub mod draws;
pub mod errors;
pub mod hmc;
pub mod input;
pub mod options;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::draws::{ChainDraws, PosteriorDraws, PosteriorSummary};
pub use self::errors::{SamplerError, SamplerResult};
pub use self::hmc::{Hmc, counter_rng_seed};
pub use self::input::SamplerInput;
pub use self::options::HmcOptions;

/// LogDensity — unnormalized log density of one unconstrained parameter.
pub trait LogDensity {
    /// `(log π(θ), d log π / dθ)`.
    fn log_density_and_gradient(&self, theta: f64) -> SamplerResult<(f64, f64)>;
}

/// PosteriorSampler — aggregated power-law data in, draws of α out.
pub trait PosteriorSampler {
    fn sample_posterior(&self, input: &SamplerInput) -> SamplerResult<PosteriorDraws>;
}
