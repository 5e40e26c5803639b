//! power_law::posterior — likelihood, posterior density and MLE for α.
//!
//! Purpose
//! -------
//! Express the power-law log-likelihood of a [`FrequencyTable`] through the
//! zeta evaluator, expose it to the optimizer ([`LogLikelihood`]) and the
//! sampler ([`LogDensity`]), and fit the maximum likelihood estimate with a
//! Laplace standard error.
//!
//! Key behaviors
//! -------------
//! - With `n = Σ f_i` and `S = Σ f_i ln v_i`:
//!
//!   ```text
//!   ℓ(α)      = -α S - n ln ζ(α, y_min)
//!   dℓ/dα     = -S - n ∂ ln ζ(α, y_min)/∂α
//!   ```
//!
//!   Only the evaluator's `(ln ζ, ∂ ln ζ/∂α)` pair is consumed.
//! - Both the optimizer and the sampler work on `θ` with
//!   `α = 1 + softplus(θ)`. The posterior density on `θ` includes the
//!   Jacobian term `ln logistic(θ)`:
//!
//!   ```text
//!   log π(θ)  = ℓ(α) + ln p(α) + ln logistic(θ)
//!   d/dθ      = (dℓ/dα + d ln p/dα) · logistic(θ) + 1 - logistic(θ)
//!   ```
//!
//! - The likelihood is the untruncated one even when the data came from a
//!   truncated generator.

use ndarray::array;
use tracing::debug;

use crate::{
    inference::calc_standard_errors,
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::{Grad, LogLikelihood, MLEOptions, Theta, maximize},
        numerical_stability::{alpha_from_theta, dalpha_dtheta, ln_logistic, theta_from_alpha},
    },
    power_law::{
        data::FrequencyTable,
        errors::{PowerLawError, PowerLawResult},
        prior::GammaPrior,
    },
    sampler::{LogDensity, SamplerResult},
    zeta::HurwitzZeta,
};

/// Starting shapes from the closed-form estimate are kept in this range.
const START_ALPHA_RANGE: (f64, f64) = (1.001, 100.0);

/// PowerLawLikelihood — `ℓ(α)` of the untruncated law at fixed `y_min`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PowerLawLikelihood {
    evaluator: HurwitzZeta,
}

impl PowerLawLikelihood {
    pub fn new(evaluator: HurwitzZeta) -> Self {
        Self { evaluator }
    }

    pub fn evaluator(&self) -> &HurwitzZeta {
        &self.evaluator
    }

    /// `(ℓ(α), dℓ/dα)` for the table.
    ///
    /// # Errors
    /// - [`PowerLawError::InvalidShape`] for `α <= 1`.
    /// - [`PowerLawError::Zeta`] if the normalizer fails.
    /// - [`PowerLawError::NonFiniteLikelihood`] if either output is not finite.
    pub fn log_likelihood(&self, alpha: f64, table: &FrequencyTable) -> PowerLawResult<(f64, f64)> {
        let n = table.total_count() as f64;
        self.evaluate_statistics(alpha, n, table.weighted_log_sum(), table.y_min())
    }

    fn evaluate_statistics(
        &self, alpha: f64, n: f64, log_sum: f64, y_min: u64,
    ) -> PowerLawResult<(f64, f64)> {
        if !alpha.is_finite() || alpha <= 1.0 {
            return Err(PowerLawError::InvalidShape {
                value: alpha,
                reason: "The likelihood is defined only for alpha > 1.",
            });
        }
        let (ln_z, d_ln_z) = self.evaluator.ln_value_and_derivative(alpha, y_min as f64)?;
        let ll = -alpha * log_sum - n * ln_z;
        let dll = -log_sum - n * d_ln_z;
        if !ll.is_finite() || !dll.is_finite() {
            return Err(PowerLawError::NonFiniteLikelihood { alpha });
        }
        Ok((ll, dll))
    }
}

fn scalar_theta(theta: &Theta) -> OptResult<f64> {
    match theta.as_slice() {
        Some(&[t]) if t.is_finite() => Ok(t),
        _ => Err(OptError::InvalidModelInput {
            text: format!("expected one finite unconstrained shape, got {theta}"),
        }),
    }
}

impl LogLikelihood for PowerLawLikelihood {
    type Data = FrequencyTable;

    fn value(&self, theta: &Theta, data: &FrequencyTable) -> OptResult<f64> {
        let alpha = alpha_from_theta(scalar_theta(theta)?);
        Ok(self.log_likelihood(alpha, data)?.0)
    }

    fn check(&self, theta: &Theta, data: &FrequencyTable) -> OptResult<()> {
        scalar_theta(theta)?;
        if data.distinct() == 0 {
            return Err(OptError::EmptyData);
        }
        Ok(())
    }

    fn grad(&self, theta: &Theta, data: &FrequencyTable) -> OptResult<Grad> {
        let t = scalar_theta(theta)?;
        let (_, dll) = self.log_likelihood(alpha_from_theta(t), data)?;
        Ok(array![dll * dalpha_dtheta(t)])
    }
}

/// MleFit — maximum likelihood shape with its Laplace standard error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MleFit {
    pub alpha: f64,
    /// Delta-method SE of α from the observed information on `θ`.
    pub se: f64,
    pub theta: f64,
    pub theta_se: f64,
    pub log_likelihood: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Maximize `ℓ(α)` over `θ` with L-BFGS, starting from the closed-form
/// estimate [`FrequencyTable::moment_alpha`].
///
/// # Errors
/// - [`PowerLawError::Fit`] for optimizer failures or a singular observed
///   information.
pub fn fit_mle(
    table: &FrequencyTable, evaluator: HurwitzZeta, opts: &MLEOptions,
) -> PowerLawResult<MleFit> {
    let likelihood = PowerLawLikelihood::new(evaluator);
    let start = table.moment_alpha();
    let start = if start.is_finite() {
        start.clamp(START_ALPHA_RANGE.0, START_ALPHA_RANGE.1)
    } else {
        2.0
    };

    let outcome = maximize(&likelihood, array![theta_from_alpha(start)], table, opts)?;
    let theta = outcome.theta_hat[0];

    let grad = |t: &Theta| likelihood.grad(t, table).unwrap_or_else(|_| array![f64::NAN]);
    let theta_se = calc_standard_errors(&grad, &outcome.theta_hat)?[0];
    let alpha = alpha_from_theta(theta);
    let se = theta_se * dalpha_dtheta(theta);

    debug!(
        start,
        alpha,
        se,
        iterations = outcome.iterations,
        converged = outcome.converged,
        status = %outcome.status,
        "maximum likelihood fit"
    );
    Ok(MleFit {
        alpha,
        se,
        theta,
        theta_se,
        log_likelihood: outcome.value,
        iterations: outcome.iterations,
        converged: outcome.converged,
    })
}

/// PowerLawPosterior — `log π(θ)` for the sampler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerLawPosterior {
    likelihood: PowerLawLikelihood,
    prior: GammaPrior,
    n: f64,
    log_sum: f64,
    y_min: u64,
}

impl PowerLawPosterior {
    /// Capture the table's sufficient statistics `(n, S, y_min)`.
    pub fn new(table: &FrequencyTable, prior: GammaPrior, evaluator: HurwitzZeta) -> Self {
        Self {
            likelihood: PowerLawLikelihood::new(evaluator),
            prior,
            n: table.total_count() as f64,
            log_sum: table.weighted_log_sum(),
            y_min: table.y_min(),
        }
    }

    pub fn prior(&self) -> &GammaPrior {
        &self.prior
    }

    /// `(log π(θ), d log π/dθ)` up to the constant `ln p(data)`.
    ///
    /// # Errors
    /// - Likelihood errors, including `θ` so negative that α rounds to 1.
    pub fn log_posterior(&self, theta: f64) -> PowerLawResult<(f64, f64)> {
        let alpha = alpha_from_theta(theta);
        let (ll, dll) =
            self.likelihood.evaluate_statistics(alpha, self.n, self.log_sum, self.y_min)?;
        let jac = dalpha_dtheta(theta);
        let lp = ll + self.prior.ln_density(alpha) + ln_logistic(theta);
        let grad = (dll + self.prior.ln_density_derivative(alpha)) * jac + (1.0 - jac);
        Ok((lp, grad))
    }
}

impl LogDensity for PowerLawPosterior {
    fn log_density_and_gradient(&self, theta: f64) -> SamplerResult<(f64, f64)> {
        Ok(self.log_posterior(theta)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - ℓ(α) against a direct term-by-term evaluation.
    // - Analytic gradients (likelihood and posterior) against centered
    //   differences.
    // - The MLE on a synthetic sample and its SE.
    //
    // They intentionally DO NOT cover:
    // - Posterior sampling (compiled model and integration tests).
    // -------------------------------------------------------------------------

    fn table() -> FrequencyTable {
        FrequencyTable::from_values(&[1, 1, 1, 1, 2, 2, 3, 5, 8, 40], 1).expect("valid data")
    }

    #[test]
    // Purpose
    // -------
    // ℓ(α) equals Σ f_i ln pmf(v_i) computed from the distribution.
    //
    // Given
    // -----
    // - The 10-observation table at α = 1.7.
    //
    // Expect
    // ------
    // - Agreement to 1e-12 relative.
    fn log_likelihood_matches_sum_of_log_pmf() {
        // Arrange
        let table = table();
        let law = crate::power_law::DiscretePowerLaw::new(1.7, 1).expect("valid law");
        let direct: f64 = table
            .values()
            .iter()
            .zip(table.frequencies())
            .map(|(&v, &f)| f as f64 * law.ln_pmf(v))
            .sum();

        // Act
        let (ll, _) = PowerLawLikelihood::default().log_likelihood(1.7, &table).expect("finite");

        // Assert
        assert_relative_eq!(ll, direct, max_relative = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Analytic gradients agree with centered differences on both scales.
    //
    // Given
    // -----
    // - α ∈ {1.2, 2.5}; θ ∈ {-1, 0.3, 2}; h = 1e-6.
    //
    // Expect
    // ------
    // - dℓ/dα and d log π/dθ to 1e-6 relative.
    fn gradients_match_centered_differences() {
        // Arrange
        let table = table();
        let lik = PowerLawLikelihood::default();
        let post = PowerLawPosterior::new(&table, GammaPrior::default(), HurwitzZeta::default());
        let h = 1e-6;

        for alpha in [1.2, 2.5] {
            // Act
            let (_, d) = lik.log_likelihood(alpha, &table).expect("finite");
            let up = lik.log_likelihood(alpha + h, &table).expect("finite").0;
            let down = lik.log_likelihood(alpha - h, &table).expect("finite").0;

            // Assert
            assert_relative_eq!(d, (up - down) / (2.0 * h), max_relative = 1e-6);
        }
        for theta in [-1.0, 0.3, 2.0] {
            let (_, d) = post.log_posterior(theta).expect("finite");
            let up = post.log_posterior(theta + h).expect("finite").0;
            let down = post.log_posterior(theta - h).expect("finite").0;
            assert_relative_eq!(d, (up - down) / (2.0 * h), max_relative = 1e-6);
        }
    }

    #[test]
    // Purpose
    // -------
    // The MLE zeroes the score and its SE matches the α-scale information.
    //
    // Given
    // -----
    // - 2000 draws from α = 2.2, y_min = 3.
    //
    // Expect
    // ------
    // - dℓ/dα(α̂) ≈ 0, α̂ within 0.2 of 2.2, converged, SE close to
    //   1/sqrt(-d²ℓ/dα²) by centered differences of the score.
    fn mle_solves_the_score_equation() {
        // Arrange
        let data = crate::power_law::DiscretePowerLaw::new(2.2, 3)
            .and_then(|l| l.sample(2000, 17))
            .expect("draws");
        let table = FrequencyTable::from_dataset(&data).expect("table");
        let lik = PowerLawLikelihood::default();

        // Act
        let fit = fit_mle(&table, HurwitzZeta::default(), &MLEOptions::default()).expect("fit");

        // Assert
        let (ll, score) = lik.log_likelihood(fit.alpha, &table).expect("finite");
        let h = 1e-5;
        let curvature = (lik.log_likelihood(fit.alpha + h, &table).expect("finite").1
            - lik.log_likelihood(fit.alpha - h, &table).expect("finite").1)
            / (2.0 * h);
        assert!(fit.converged);
        assert!(score.abs() < 1e-4 * table.total_count() as f64, "score {score}");
        assert!((fit.alpha - 2.2).abs() < 0.2, "alpha_hat {}", fit.alpha);
        assert_relative_eq!(fit.log_likelihood, ll, max_relative = 1e-10);
        assert_relative_eq!(fit.se, 1.0 / (-curvature).sqrt(), max_relative = 1e-3);
    }

    #[test]
    // Purpose
    // -------
    // Invalid shapes and parameter vectors are rejected.
    //
    // Given
    // -----
    // - α = 1 for the likelihood; a length-2 θ for the optimizer interface.
    //
    // Expect
    // ------
    // - InvalidShape and InvalidModelInput.
    fn invalid_inputs_are_rejected() {
        // Arrange
        let lik = PowerLawLikelihood::default();

        // Act / Assert
        assert!(matches!(
            lik.log_likelihood(1.0, &table()),
            Err(PowerLawError::InvalidShape { .. })
        ));
        assert!(matches!(
            lik.check(&array![0.0, 1.0], &table()),
            Err(OptError::InvalidModelInput { .. })
        ));
    }
}
