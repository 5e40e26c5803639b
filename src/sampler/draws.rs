//! sampler::draws — per-chain output and posterior summaries.

use crate::sampler::{
    diagnostics::{effective_sample_size, quantile, split_r_hat},
    errors::{SamplerError, SamplerResult},
};

/// ChainDraws — retained draws and adaptation state of one chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainDraws {
    pub chain: usize,
    pub draws: Vec<f64>,
    /// Divergent transitions after warmup.
    pub divergences: usize,
    /// Mean acceptance statistic after warmup.
    pub mean_accept: f64,
    pub step_size: f64,
    pub inv_metric: f64,
}

/// PosteriorDraws — draws of one scalar parameter across chains.
#[derive(Debug, Clone, PartialEq)]
pub struct PosteriorDraws {
    chains: Vec<ChainDraws>,
}

impl PosteriorDraws {
    /// # Errors
    /// - [`SamplerError::EmptyDraws`] if there are no chains or no draws.
    /// - [`SamplerError::InvalidInput`] if chains differ in length.
    pub fn new(chains: Vec<ChainDraws>) -> SamplerResult<Self> {
        let n = chains.first().map(|c| c.draws.len()).ok_or(SamplerError::EmptyDraws)?;
        if n == 0 {
            return Err(SamplerError::EmptyDraws);
        }
        if chains.iter().any(|c| c.draws.len() != n) {
            return Err(SamplerError::InvalidInput { reason: "Chains must have equal length." });
        }
        Ok(Self { chains })
    }

    pub fn chains(&self) -> &[ChainDraws] {
        &self.chains
    }

    pub fn num_chains(&self) -> usize {
        self.chains.len()
    }

    pub fn draws_per_chain(&self) -> usize {
        self.chains.first().map_or(0, |c| c.draws.len())
    }

    /// All draws, chain by chain.
    pub fn pooled(&self) -> Vec<f64> {
        self.chains.iter().flat_map(|c| c.draws.iter().copied()).collect()
    }

    pub fn divergences(&self) -> usize {
        self.chains.iter().map(|c| c.divergences).sum()
    }

    /// Apply `f` to every draw, keeping chain metadata.
    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> PosteriorDraws {
        let chains = self
            .chains
            .iter()
            .map(|c| ChainDraws { draws: c.draws.iter().map(|&x| f(x)).collect(), ..c.clone() })
            .collect();
        PosteriorDraws { chains }
    }

    pub fn summary(&self) -> SamplerResult<PosteriorSummary> {
        let refs: Vec<&[f64]> = self.chains.iter().map(|c| c.draws.as_slice()).collect();
        let mut pooled = self.pooled();
        let n = pooled.len() as f64;
        let mean = pooled.iter().sum::<f64>() / n;
        let sd = if pooled.len() > 1 {
            (pooled.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (n - 1.0)).sqrt()
        } else {
            0.0
        };
        pooled.sort_by(f64::total_cmp);

        Ok(PosteriorSummary {
            mean,
            sd,
            q05: quantile(&pooled, 0.05),
            median: quantile(&pooled, 0.5),
            q95: quantile(&pooled, 0.95),
            r_hat: split_r_hat(&refs)?,
            ess: effective_sample_size(&refs)?,
            divergences: self.divergences(),
            draws: pooled.len(),
        })
    }
}

/// PosteriorSummary — scalar posterior summary with convergence diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PosteriorSummary {
    pub mean: f64,
    pub sd: f64,
    pub q05: f64,
    pub median: f64,
    pub q95: f64,
    pub r_hat: f64,
    pub ess: f64,
    pub divergences: usize,
    pub draws: usize,
}

impl PosteriorSummary {
    /// `value` lies inside the central 90% interval.
    pub fn covers(&self, value: f64) -> bool {
        self.q05 <= value && value <= self.q95
    }
}
