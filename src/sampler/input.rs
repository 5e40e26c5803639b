//! sampler::input — the data handed across the sampler boundary.

use crate::sampler::errors::{SamplerError, SamplerResult};

/// SamplerInput — aggregated power-law data and prior hyperparameters.
///
/// Fields
/// ------
/// - `values`: distinct observed values, strictly ascending, each `>= y_min`.
/// - `frequencies`: positive counts aligned with `values`.
/// - `y_min`: fixed lower support point `q`.
/// - `prior_shape`, `prior_rate`: Gamma prior on α.
/// - `seed`: base seed; chain `c` uses a counter-derived seed.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerInput {
    pub values: Vec<u64>,
    pub frequencies: Vec<u64>,
    pub y_min: u64,
    pub prior_shape: f64,
    pub prior_rate: f64,
    pub seed: u64,
}

impl SamplerInput {
    /// Number of distinct values `K`.
    pub fn distinct(&self) -> usize {
        self.values.len()
    }

    pub fn total_count(&self) -> u64 {
        self.frequencies.iter().sum()
    }

    pub fn validate(&self) -> SamplerResult<()> {
        if self.values.is_empty() {
            return Err(SamplerError::InvalidInput {
                reason: "At least one observed value is required.",
            });
        }
        if self.values.len() != self.frequencies.len() {
            return Err(SamplerError::InvalidInput {
                reason: "values and frequencies must have equal length.",
            });
        }
        if self.y_min == 0 {
            return Err(SamplerError::InvalidInput { reason: "y_min must be at least 1." });
        }
        if self.values[0] < self.y_min {
            return Err(SamplerError::InvalidInput { reason: "Every value must be >= y_min." });
        }
        if self.values.windows(2).any(|w| w[0] >= w[1]) {
            return Err(SamplerError::InvalidInput {
                reason: "values must be strictly ascending.",
            });
        }
        if self.frequencies.contains(&0) {
            return Err(SamplerError::InvalidInput { reason: "Frequencies must be positive." });
        }
        for hyper in [self.prior_shape, self.prior_rate] {
            if !hyper.is_finite() || hyper <= 0.0 {
                return Err(SamplerError::InvalidInput {
                    reason: "Prior shape and rate must be finite and positive.",
                });
            }
        }
        Ok(())
    }
}
