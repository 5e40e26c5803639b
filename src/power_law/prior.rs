//! power_law::prior — Gamma prior on the shape α.

use statrs::function::gamma::ln_gamma;

use crate::power_law::errors::{PowerLawError, PowerLawResult};

pub const DEFAULT_PRIOR_SHAPE: f64 = 0.5;
pub const DEFAULT_PRIOR_RATE: f64 = 1.0;

/// GammaPrior — `α ~ Gamma(shape, rate)`, normalized with `statrs` log-gamma.
///
/// The prior is placed on α itself; mass on `(0, 1]` is irrelevant because
/// the posterior only ever evaluates it at `α = 1 + softplus(θ) > 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammaPrior {
    shape: f64,
    rate: f64,
    ln_norm: f64,
}

impl GammaPrior {
    /// # Errors
    /// - [`PowerLawError::InvalidPrior`] unless both hyperparameters are
    ///   finite and positive.
    pub fn new(shape: f64, rate: f64) -> PowerLawResult<Self> {
        if !shape.is_finite() || shape <= 0.0 || !rate.is_finite() || rate <= 0.0 {
            return Err(PowerLawError::InvalidPrior {
                shape,
                rate,
                reason: "Shape and rate must be finite and positive.",
            });
        }
        Ok(Self::from_parts(shape, rate))
    }

    fn from_parts(shape: f64, rate: f64) -> Self {
        Self { shape, rate, ln_norm: shape * rate.ln() - ln_gamma(shape) }
    }

    pub fn shape(&self) -> f64 {
        self.shape
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// `ln p(α)`; `-∞` for `α <= 0`.
    pub fn ln_density(&self, alpha: f64) -> f64 {
        if alpha <= 0.0 {
            return f64::NEG_INFINITY;
        }
        self.ln_norm + (self.shape - 1.0) * alpha.ln() - self.rate * alpha
    }

    /// `d ln p(α) / dα = (shape - 1)/α - rate`.
    pub fn ln_density_derivative(&self, alpha: f64) -> f64 {
        (self.shape - 1.0) / alpha - self.rate
    }
}

impl Default for GammaPrior {
    fn default() -> Self {
        Self::from_parts(DEFAULT_PRIOR_SHAPE, DEFAULT_PRIOR_RATE)
    }
}
