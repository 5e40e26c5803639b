//! power_law::compiled — the process-wide posterior program.
//!
//! [`CompiledModel`] bundles everything that is fixed across experiments:
//! the evaluator configuration, the HMC options and the optimizer options
//! used for the warm start. [`CompiledModel::global`] builds it once on
//! first use and hands out the same instance for the life of the process.
//!
//! Inference runs in two stages:
//! 1. MLE on `θ` with its Laplace standard error. Chains start around `θ̂`
//!    and the SE seeds the sampler metric.
//! 2. HMC on `log π(θ)`; draws are mapped back to α.
//!
//! A failed or unconverged warm start is logged and replaced by the
//! closed-form starting shape with unit scale; it never aborts inference on
//! its own.

use std::sync::OnceLock;

use tracing::{info, warn};

use crate::{
    optimization::{
        loglik_optimizer::MLEOptions,
        numerical_stability::{alpha_from_theta, theta_from_alpha},
    },
    power_law::{
        data::FrequencyTable,
        errors::PowerLawResult,
        posterior::{MleFit, PowerLawPosterior, fit_mle},
        prior::GammaPrior,
    },
    sampler::{
        Hmc, PosteriorDraws, PosteriorSampler, PosteriorSummary, SamplerInput, SamplerResult,
    },
    zeta::HurwitzZeta,
};

static GLOBAL_MODEL: OnceLock<CompiledModel> = OnceLock::new();

/// PosteriorFit — draws of α with their summary and the warm-start fit.
#[derive(Debug, Clone, PartialEq)]
pub struct PosteriorFit {
    pub draws: PosteriorDraws,
    pub summary: PosteriorSummary,
    /// `None` when the MLE warm start failed.
    pub mle: Option<MleFit>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledModel {
    evaluator: HurwitzZeta,
    hmc: Hmc,
    mle_options: MLEOptions,
}

impl CompiledModel {
    pub fn new(evaluator: HurwitzZeta, hmc: Hmc, mle_options: MLEOptions) -> Self {
        Self { evaluator, hmc, mle_options }
    }

    /// Shared instance with default evaluator, sampler and optimizer options.
    pub fn global() -> &'static CompiledModel {
        GLOBAL_MODEL.get_or_init(|| {
            let model = CompiledModel::default();
            info!(
                chains = model.hmc.options().chains,
                warmup = model.hmc.options().warmup,
                draws = model.hmc.options().draws,
                "compiled power-law posterior"
            );
            model
        })
    }

    pub fn evaluator(&self) -> &HurwitzZeta {
        &self.evaluator
    }

    pub fn hmc(&self) -> &Hmc {
        &self.hmc
    }

    pub fn mle_options(&self) -> &MLEOptions {
        &self.mle_options
    }

    /// Maximum likelihood fit with the model's evaluator and options.
    pub fn fit_mle(&self, table: &FrequencyTable) -> PowerLawResult<MleFit> {
        fit_mle(table, self.evaluator, &self.mle_options)
    }

    /// Posterior draws of α for `table` under `prior`.
    ///
    /// # Errors
    /// - [`PowerLawError::Sampler`](crate::power_law::PowerLawError::Sampler)
    ///   if the sampler cannot produce draws.
    pub fn infer(
        &self, table: &FrequencyTable, prior: GammaPrior, seed: u64,
    ) -> PowerLawResult<PosteriorFit> {
        let mle = match self.fit_mle(table) {
            Ok(fit) if !fit.converged => {
                warn!(
                    y_min = table.y_min(),
                    iterations = fit.iterations,
                    alpha = fit.alpha,
                    "MLE did not converge"
                );
                None
            }
            Ok(fit) if fit.theta_se.is_finite() && fit.theta_se > 0.0 => Some(fit),
            Ok(fit) => {
                warn!(y_min = table.y_min(), theta_se = fit.theta_se, "unusable Laplace scale");
                None
            }
            Err(err) => {
                warn!(y_min = table.y_min(), error = %err, "MLE warm start failed");
                None
            }
        };
        let (init_theta, init_scale) = match &mle {
            Some(fit) => (fit.theta, fit.theta_se),
            None => (theta_from_alpha(table.moment_alpha().clamp(1.001, 100.0)), 1.0),
        };

        let posterior = PowerLawPosterior::new(table, prior, self.evaluator);
        let draws =
            self.hmc.sample(&posterior, init_theta, init_scale, seed)?.map(alpha_from_theta);
        let summary = draws.summary()?;
        info!(
            y_min = table.y_min(),
            n = table.total_count(),
            mean = summary.mean,
            sd = summary.sd,
            r_hat = summary.r_hat,
            ess = summary.ess,
            divergences = summary.divergences,
            "posterior for alpha"
        );
        Ok(PosteriorFit { draws, summary, mle })
    }
}

impl PosteriorSampler for CompiledModel {
    fn sample_posterior(&self, input: &SamplerInput) -> SamplerResult<PosteriorDraws> {
        let table = FrequencyTable::from_sampler_input(input)?;
        let prior = GammaPrior::new(input.prior_shape, input.prior_rate)?;
        Ok(self.infer(&table, prior, input.seed)?.draws)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        optimization::loglik_optimizer::{LineSearcher, Tolerances},
        power_law::DiscretePowerLaw,
        sampler::HmcOptions,
    };

    #[test]
    // Purpose
    // -------
    // `global` returns one shared instance.
    //
    // Given
    // -----
    // - Two calls to CompiledModel::global().
    //
    // Expect
    // ------
    // - The same address, carrying default options.
    fn global_model_is_built_once() {
        // Act
        let a = CompiledModel::global();
        let b = CompiledModel::global();

        // Assert
        assert!(std::ptr::eq(a, b));
        assert_eq!(a.hmc().options(), &HmcOptions::default());
    }

    #[test]
    // Purpose
    // -------
    // The sampler boundary turns a payload into α draws near the truth.
    //
    // Given
    // -----
    // - 800 draws from α = 2, y_min = 1; a small sampler (4 chains,
    //   300 + 300 iterations).
    //
    // Expect
    // ------
    // - 4 × 300 draws, all > 1, pooled mean within 0.25 of 2.
    fn sampler_boundary_recovers_shape() {
        // Arrange
        let data = DiscretePowerLaw::new(2.0, 1).and_then(|l| l.sample(800, 4)).expect("draws");
        let input = FrequencyTable::from_dataset(&data)
            .expect("table")
            .to_sampler_input(0.5, 1.0, 21);
        let hmc = Hmc::new(HmcOptions::new(4, 300, 300).expect("valid options")).expect("valid");
        let model = CompiledModel::new(HurwitzZeta::default(), hmc, MLEOptions::default());

        // Act
        let draws = model.sample_posterior(&input).expect("sampling succeeds");

        // Assert
        assert_eq!(draws.num_chains(), 4);
        assert_eq!(draws.draws_per_chain(), 300);
        let pooled = draws.pooled();
        assert!(pooled.iter().all(|&a| a > 1.0));
        let mean = pooled.iter().sum::<f64>() / pooled.len() as f64;
        assert!((mean - 2.0).abs() < 0.25, "posterior mean {mean}");
    }

    #[test]
    // Purpose
    // -------
    // An MLE stopped by the iteration cap is not used as the warm start nor
    // reported, and sampling still succeeds from the fallback start.
    //
    // Given
    // -----
    // - 800 draws from α = 1.8, y_min = 2; optimizer capped at one iteration
    //   with a gradient tolerance it cannot reach; 2 chains, 200 + 200.
    //
    // Expect
    // ------
    // - The direct fit is not converged (or fails outright).
    // - `infer` returns mle = None and a posterior mean within 0.3 of 1.8.
    fn unconverged_warm_start_falls_back() {
        // Arrange
        let data = DiscretePowerLaw::new(1.8, 2).and_then(|l| l.sample(800, 9)).expect("draws");
        let table = FrequencyTable::from_dataset(&data).expect("table");
        let tols = Tolerances::new(Some(1e-14), None, Some(1)).expect("valid tolerances");
        let opts =
            MLEOptions::new(tols, LineSearcher::MoreThuente, false, None).expect("valid options");
        let hmc = Hmc::new(HmcOptions::new(2, 200, 200).expect("valid options")).expect("valid");
        let model = CompiledModel::new(HurwitzZeta::default(), hmc, opts);

        // Act
        let direct = model.fit_mle(&table);
        let fit = model.infer(&table, GammaPrior::default(), 5).expect("inference runs");

        // Assert
        assert!(direct.map_or(true, |f| !f.converged));
        assert!(fit.mle.is_none());
        assert!((fit.summary.mean - 1.8).abs() < 0.3, "posterior mean {}", fit.summary.mean);
    }
}
