//! sampler::hmc — static-trajectory Hamiltonian Monte Carlo in one dimension.
//!
//! Purpose
//! -------
//! Draw from a 1-D log density on the real line using its gradient, with
//! step-size and metric adaptation during warmup, running chains in parallel.
//!
//! Key behaviors
//! -------------
//! - Leapfrog integration with a diagonal (scalar) inverse metric `m`:
//!   `H(θ, p) = -log π(θ) + ½ m p²`.
//! - Integration time is `trajectory_length · U(1 - jitter, 1 + jitter)`;
//!   the number of leapfrog steps is `ceil(time / ε)`, capped at
//!   `max_leapfrog`.
//! - Warmup: dual averaging of `ε` throughout; `m` is set once from the
//!   regularized variance of the middle warmup window, after which `ε` is
//!   re-initialized and adaptation restarts. The averaged `ε` is frozen for
//!   sampling.
//! - A transition whose energy error exceeds `max_energy_error`, or whose
//!   trajectory hits a point where the density cannot be evaluated, is
//!   divergent: it is rejected and counted, never fatal.
//!
//! Conventions
//! -----------
//! - Chain `c` uses `Xoshiro256PlusPlus` seeded with
//!   `counter_rng_seed(seed, c)`; results are reproducible for a fixed seed
//!   regardless of thread scheduling.

use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::sampler::{
    LogDensity,
    adaptation::{DualAveraging, RunningVariance, WarmupSchedule},
    draws::{ChainDraws, PosteriorDraws},
    errors::{SamplerError, SamplerResult},
    options::HmcOptions,
};

const INIT_ATTEMPTS: usize = 20;
const INIT_RADIUS: f64 = 2.0;
const STEP_SEARCH_LIMIT: usize = 50;
const MIN_STEP: f64 = 1e-8;
const MAX_STEP: f64 = 1e3;

/// SplitMix64 finalizer over `base_seed + counter · φ`; independent
/// per-chain seeds from one base seed.
pub fn counter_rng_seed(base_seed: u64, counter: u64) -> u64 {
    let mut z = base_seed.wrapping_add(counter.wrapping_mul(0x9e37_79b9_7f4a_7c15));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[derive(Debug, Clone, Copy)]
struct Point {
    theta: f64,
    lp: f64,
    grad: f64,
}

struct Transition {
    proposal: Option<Point>,
    accept_prob: f64,
    divergent: bool,
}

fn eval<D: LogDensity + ?Sized>(density: &D, theta: f64) -> SamplerResult<Point> {
    let (lp, grad) = density.log_density_and_gradient(theta)?;
    if !lp.is_finite() || !grad.is_finite() {
        return Err(SamplerError::NonFiniteDensity { theta });
    }
    Ok(Point { theta, lp, grad })
}

/// Hmc — the in-crate gradient-based sampler.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Hmc {
    options: HmcOptions,
}

impl Hmc {
    pub fn new(options: HmcOptions) -> SamplerResult<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &HmcOptions {
        &self.options
    }

    /// Run all chains.
    ///
    /// `init_theta` centres chain initialization (each chain starts within
    /// `±2 · init_scale` of it) and `init_scale²` is the starting inverse
    /// metric. A Laplace approximation at the mode is a good choice for both.
    ///
    /// # Errors
    /// - [`SamplerError::InvalidInput`] for a non-finite centre or a
    ///   non-positive scale.
    /// - [`SamplerError::InvalidInitialPoint`] if a chain finds no point with
    ///   a finite density.
    pub fn sample<D>(
        &self, density: &D, init_theta: f64, init_scale: f64, seed: u64,
    ) -> SamplerResult<PosteriorDraws>
    where
        D: LogDensity + Sync + ?Sized,
    {
        if !init_theta.is_finite() {
            return Err(SamplerError::InvalidInput { reason: "Initial theta must be finite." });
        }
        if !init_scale.is_finite() || init_scale <= 0.0 {
            return Err(SamplerError::InvalidInput {
                reason: "Initial scale must be finite and positive.",
            });
        }
        let opts = &self.options;
        info!(
            chains = opts.chains,
            warmup = opts.warmup,
            draws = opts.draws,
            init_theta,
            init_scale,
            "starting HMC"
        );

        let chains = (0..opts.chains)
            .into_par_iter()
            .map(|chain| self.run_chain(density, chain, init_theta, init_scale, seed))
            .collect::<SamplerResult<Vec<_>>>()?;
        let draws = PosteriorDraws::new(chains)?;

        if draws.divergences() > 0 {
            warn!(divergences = draws.divergences(), "divergent transitions after warmup");
        }
        Ok(draws)
    }

    fn run_chain<D>(
        &self, density: &D, chain: usize, init_theta: f64, init_scale: f64, seed: u64,
    ) -> SamplerResult<ChainDraws>
    where
        D: LogDensity + ?Sized,
    {
        let opts = &self.options;
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(counter_rng_seed(seed, chain as u64));
        let mut current = initial_point(density, &mut rng, init_theta, init_scale)?;

        let mut inv_metric = init_scale * init_scale;
        let mut step = reasonable_step(density, &current, inv_metric, &mut rng);
        let mut adapter = DualAveraging::new(step, opts.target_accept);
        let schedule = WarmupSchedule::new(opts.warmup);
        let mut window = RunningVariance::default();

        let mut draws = Vec::with_capacity(opts.draws);
        let mut divergences = 0;
        let mut accept_sum = 0.0;

        for iter in 0..opts.warmup + opts.draws {
            let t = transition(density, &current, step, inv_metric, opts, &mut rng);
            if let Some(proposal) = t.proposal {
                if rng.random::<f64>() < t.accept_prob {
                    current = proposal;
                }
            }

            if schedule.is_warmup(iter) {
                step = adapter.update(t.accept_prob).clamp(MIN_STEP, MAX_STEP);
                if schedule.in_metric_window(iter) {
                    window.push(current.theta);
                }
                if schedule.closes_window(iter) {
                    if let Some(var) = window.regularized() {
                        inv_metric = var;
                    }
                    step = reasonable_step(density, &current, inv_metric, &mut rng);
                    adapter = DualAveraging::new(step, opts.target_accept);
                }
                if iter + 1 == opts.warmup {
                    step = adapter.final_step_size().clamp(MIN_STEP, MAX_STEP);
                }
            } else {
                divergences += usize::from(t.divergent);
                accept_sum += t.accept_prob;
                draws.push(current.theta);
            }
        }

        let mean_accept = accept_sum / opts.draws as f64;
        debug!(chain, step_size = step, inv_metric, divergences, mean_accept, "chain finished");
        Ok(ChainDraws { chain, draws, divergences, mean_accept, step_size: step, inv_metric })
    }
}

fn initial_point<D, R>(density: &D, rng: &mut R, centre: f64, scale: f64) -> SamplerResult<Point>
where
    D: LogDensity + ?Sized,
    R: Rng,
{
    let mut last_error = String::new();
    for _ in 0..INIT_ATTEMPTS {
        let theta = centre + scale * INIT_RADIUS * (2.0 * rng.random::<f64>() - 1.0);
        match eval(density, theta) {
            Ok(point) => return Ok(point),
            Err(err) => last_error = err.to_string(),
        }
    }
    eval(density, centre)
        .map_err(|_| SamplerError::InvalidInitialPoint { theta: centre, reason: last_error })
}

fn leapfrog<D: LogDensity + ?Sized>(
    density: &D, start: &Point, p0: f64, step: f64, inv_metric: f64, n_steps: usize,
) -> SamplerResult<(Point, f64)> {
    let mut p = p0 + 0.5 * step * start.grad;
    let mut point = *start;
    for i in 0..n_steps {
        point = eval(density, point.theta + step * inv_metric * p)?;
        let weight = if i + 1 == n_steps { 0.5 } else { 1.0 };
        p += weight * step * point.grad;
    }
    Ok((point, p))
}

fn hamiltonian(point: &Point, p: f64, inv_metric: f64) -> f64 {
    -point.lp + 0.5 * inv_metric * p * p
}

fn transition<D, R>(
    density: &D, start: &Point, step: f64, inv_metric: f64, opts: &HmcOptions, rng: &mut R,
) -> Transition
where
    D: LogDensity + ?Sized,
    R: Rng,
{
    let p0 = rng.sample::<f64, _>(StandardNormal) / inv_metric.sqrt();
    let h0 = hamiltonian(start, p0, inv_metric);
    let jitter = 1.0 + opts.trajectory_jitter * (2.0 * rng.random::<f64>() - 1.0);
    let time = opts.trajectory_length * jitter;
    let n_steps = ((time / step).ceil() as usize).clamp(1, opts.max_leapfrog);

    let divergent = Transition { proposal: None, accept_prob: 0.0, divergent: true };
    let Ok((end, p)) = leapfrog(density, start, p0, step, inv_metric, n_steps) else {
        return divergent;
    };
    let energy_error = hamiltonian(&end, p, inv_metric) - h0;
    if !energy_error.is_finite() || energy_error > opts.max_energy_error {
        return divergent;
    }
    Transition {
        proposal: Some(end),
        accept_prob: (-energy_error).exp().min(1.0),
        divergent: false,
    }
}

/// Double or halve `ε` from 1 until a single leapfrog step's acceptance
/// crosses 1/2.
fn reasonable_step<D, R>(density: &D, start: &Point, inv_metric: f64, rng: &mut R) -> f64
where
    D: LogDensity + ?Sized,
    R: Rng,
{
    let p0 = rng.sample::<f64, _>(StandardNormal) / inv_metric.sqrt();
    let h0 = hamiltonian(start, p0, inv_metric);
    let log_accept = |step: f64| match leapfrog(density, start, p0, step, inv_metric, 1) {
        Ok((end, p)) => {
            let la = h0 - hamiltonian(&end, p, inv_metric);
            if la.is_nan() { f64::NEG_INFINITY } else { la }
        }
        Err(_) => f64::NEG_INFINITY,
    };

    let threshold = -std::f64::consts::LN_2;
    let mut step = 1.0;
    let mut la = log_accept(step);
    let grow = la > threshold;
    for _ in 0..STEP_SEARCH_LIMIT {
        if grow != (la > threshold) {
            break;
        }
        step = if grow { step * 2.0 } else { step * 0.5 };
        if !(MIN_STEP..=MAX_STEP).contains(&step) {
            break;
        }
        la = log_accept(step);
    }
    step.clamp(MIN_STEP, MAX_STEP)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Normal(mu, sigma²) in θ.
    struct Normal {
        mu: f64,
        sigma: f64,
    }

    impl LogDensity for Normal {
        fn log_density_and_gradient(&self, theta: f64) -> SamplerResult<(f64, f64)> {
            let z = (theta - self.mu) / self.sigma;
            Ok((-0.5 * z * z, -z / self.sigma))
        }
    }

    /// Standard normal that cannot be evaluated above `wall`.
    struct Walled {
        wall: f64,
    }

    impl LogDensity for Walled {
        fn log_density_and_gradient(&self, theta: f64) -> SamplerResult<(f64, f64)> {
            if theta > self.wall {
                return Err(SamplerError::Density { text: "beyond wall".into() });
            }
            Ok((-0.5 * theta * theta, -theta))
        }
    }

    struct Broken;

    impl LogDensity for Broken {
        fn log_density_and_gradient(&self, _theta: f64) -> SamplerResult<(f64, f64)> {
            Ok((f64::NAN, 0.0))
        }
    }

    fn small() -> Hmc {
        Hmc::new(HmcOptions::new(4, 300, 500).expect("valid options")).expect("valid sampler")
    }

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Recovery of a shifted, scaled normal with a poor starting metric.
    // - Reproducibility for a fixed seed.
    // - Evaluation failures inside trajectories counted as divergences.
    // - Initialization failure and invalid inputs.
    //
    // They intentionally DO NOT cover:
    // - The power-law posterior (see `power_law`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // HMC recovers N(3, 0.5²) starting from a metric four times too wide.
    //
    // Given
    // -----
    // - 4 chains × (300 warmup + 500 draws), init at θ = 2 with scale 1.
    //
    // Expect
    // ------
    // - Mean within 0.1 of 3, sd within [0.4, 0.6], R̂ < 1.05, no divergences,
    //   and an adapted inverse metric near 0.25.
    fn recovers_shifted_normal() {
        // Arrange
        let target = Normal { mu: 3.0, sigma: 0.5 };

        // Act
        let draws = small().sample(&target, 2.0, 1.0, 42).expect("sampling succeeds");
        let summary = draws.summary().expect("summary");

        // Assert
        assert!((summary.mean - 3.0).abs() < 0.1, "mean = {}", summary.mean);
        assert!((0.4..=0.6).contains(&summary.sd), "sd = {}", summary.sd);
        assert!(summary.r_hat < 1.05, "r_hat = {}", summary.r_hat);
        assert_eq!(summary.divergences, 0);
        for chain in draws.chains() {
            assert!((0.1..=0.5).contains(&chain.inv_metric), "m = {}", chain.inv_metric);
        }
    }

    #[test]
    // Purpose
    // -------
    // A fixed seed reproduces the draws exactly; a different seed does not.
    //
    // Given
    // -----
    // - Two runs with seed 7 and one with seed 8 on a standard normal.
    //
    // Expect
    // ------
    // - Identical draws for equal seeds, different draws otherwise.
    fn fixed_seed_is_reproducible() {
        // Arrange
        let target = Normal { mu: 0.0, sigma: 1.0 };
        let hmc = small();

        // Act
        let a = hmc.sample(&target, 0.0, 1.0, 7).expect("sampling succeeds");
        let b = hmc.sample(&target, 0.0, 1.0, 7).expect("sampling succeeds");
        let c = hmc.sample(&target, 0.0, 1.0, 8).expect("sampling succeeds");

        // Assert
        assert_eq!(a, b);
        assert_ne!(a.pooled(), c.pooled());
    }

    #[test]
    // Purpose
    // -------
    // Trajectories that step past an unevaluable region are rejected, not fatal.
    //
    // Given
    // -----
    // - Standard normal that errors above θ = 0.5.
    //
    // Expect
    // ------
    // - Sampling succeeds; every draw is <= 0.5.
    fn unevaluable_region_is_rejected() {
        // Arrange
        let target = Walled { wall: 0.5 };

        // Act
        let draws = small().sample(&target, -1.0, 1.0, 5).expect("sampling succeeds");

        // Assert
        assert!(draws.pooled().iter().all(|&x| x <= 0.5));
    }

    #[test]
    // Purpose
    // -------
    // Unusable densities and initial values are reported as errors.
    //
    // Given
    // -----
    // - A density that is NaN everywhere; a NaN centre; a zero scale.
    //
    // Expect
    // ------
    // - InvalidInitialPoint, then InvalidInput twice.
    fn unusable_inputs_are_errors() {
        // Arrange
        let hmc = small();
        let normal = Normal { mu: 0.0, sigma: 1.0 };

        // Act / Assert
        assert!(matches!(
            hmc.sample(&Broken, 0.0, 1.0, 1),
            Err(SamplerError::InvalidInitialPoint { .. })
        ));
        assert!(matches!(
            hmc.sample(&normal, f64::NAN, 1.0, 1),
            Err(SamplerError::InvalidInput { .. })
        ));
        assert!(matches!(hmc.sample(&normal, 0.0, 0.0, 1), Err(SamplerError::InvalidInput { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Counter seeds differ across chains and are stable.
    //
    // Given
    // -----
    // - Base seed 42, counters 0..8.
    //
    // Expect
    // ------
    // - Eight distinct seeds; the same call twice gives the same value.
    fn counter_seeds_are_distinct() {
        // Act
        let mut seeds: Vec<u64> = (0..8).map(|c| counter_rng_seed(42, c)).collect();
        seeds.sort_unstable();
        seeds.dedup();

        // Assert
        assert_eq!(seeds.len(), 8);
        assert_eq!(counter_rng_seed(42, 3), counter_rng_seed(42, 3));
    }
}
