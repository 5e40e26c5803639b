//! sampler::options — HMC run configuration.

use crate::sampler::errors::{SamplerError, SamplerResult};

pub const DEFAULT_CHAINS: usize = 8;
pub const DEFAULT_WARMUP: usize = 500;
pub const DEFAULT_DRAWS: usize = 500;
pub const DEFAULT_TARGET_ACCEPT: f64 = 0.8;
pub const DEFAULT_MAX_LEAPFROG: usize = 128;
/// Integration time in metric-scaled units; a quarter period of a unit
/// Gaussian, where successive states are close to uncorrelated.
pub const DEFAULT_TRAJECTORY_LENGTH: f64 = std::f64::consts::FRAC_PI_2;
pub const DEFAULT_TRAJECTORY_JITTER: f64 = 0.2;
/// Energy error above which a transition is flagged divergent.
pub const DEFAULT_MAX_ENERGY_ERROR: f64 = 1000.0;

/// HmcOptions — chain counts, adaptation target and trajectory policy.
///
/// Fields
/// ------
/// - `chains`: independent chains, run in parallel.
/// - `warmup`: adaptation iterations per chain (discarded).
/// - `draws`: retained iterations per chain.
/// - `target_accept`: dual-averaging acceptance target in (0, 1).
/// - `max_leapfrog`: cap on leapfrog steps per transition.
/// - `trajectory_length`: mean integration time.
/// - `trajectory_jitter`: integration time is drawn from
///   `trajectory_length · U(1 - jitter, 1 + jitter)`.
/// - `max_energy_error`: divergence threshold on the Hamiltonian error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HmcOptions {
    pub chains: usize,
    pub warmup: usize,
    pub draws: usize,
    pub target_accept: f64,
    pub max_leapfrog: usize,
    pub trajectory_length: f64,
    pub trajectory_jitter: f64,
    pub max_energy_error: f64,
}

impl HmcOptions {
    /// Options with default adaptation and trajectory policy.
    pub fn new(chains: usize, warmup: usize, draws: usize) -> SamplerResult<Self> {
        let opts = Self { chains, warmup, draws, ..Self::default() };
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> SamplerResult<()> {
        if self.chains == 0 {
            return Err(SamplerError::InvalidOptions { reason: "At least one chain is required." });
        }
        if self.draws < 4 {
            return Err(SamplerError::InvalidOptions {
                reason: "At least four draws per chain are required for split diagnostics.",
            });
        }
        if !(self.target_accept > 0.0 && self.target_accept < 1.0) {
            return Err(SamplerError::InvalidOptions {
                reason: "target_accept must lie strictly between 0 and 1.",
            });
        }
        if self.max_leapfrog == 0 {
            return Err(SamplerError::InvalidOptions { reason: "max_leapfrog must be positive." });
        }
        if !self.trajectory_length.is_finite() || self.trajectory_length <= 0.0 {
            return Err(SamplerError::InvalidOptions {
                reason: "trajectory_length must be finite and positive.",
            });
        }
        if !(0.0..1.0).contains(&self.trajectory_jitter) {
            return Err(SamplerError::InvalidOptions {
                reason: "trajectory_jitter must lie in [0, 1).",
            });
        }
        if !(self.max_energy_error > 0.0) {
            return Err(SamplerError::InvalidOptions {
                reason: "max_energy_error must be positive.",
            });
        }
        Ok(())
    }
}

impl Default for HmcOptions {
    fn default() -> Self {
        Self {
            chains: DEFAULT_CHAINS,
            warmup: DEFAULT_WARMUP,
            draws: DEFAULT_DRAWS,
            target_accept: DEFAULT_TARGET_ACCEPT,
            max_leapfrog: DEFAULT_MAX_LEAPFROG,
            trajectory_length: DEFAULT_TRAJECTORY_LENGTH,
            trajectory_jitter: DEFAULT_TRAJECTORY_JITTER,
            max_energy_error: DEFAULT_MAX_ENERGY_ERROR,
        }
    }
}
