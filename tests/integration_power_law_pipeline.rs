//! Integration tests for the discrete power-law pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end path: inversion sampling of synthetic data,
//!   χ² checks against the generating pmf, aggregation into frequency
//!   tables, MLE warm start, and HMC posterior inference through the
//!   compiled model.
//! - Run at the scale the recovery study is defined for (8 chains × 500
//!   post-warmup draws, N = 1000, α = 1.5).
//!
//! Coverage
//! --------
//! - `power_law::Experiment` over the default offsets {1, 10, 100, 1000}.
//! - `power_law::CompiledModel` through the `PosteriorSampler` boundary.
//! - Posterior concentration as N grows.
//! - Truncated generation checked against its renormalized pmf.
//!
//! Exclusions
//! ----------
//! - Sampler internals (adaptation, diagnostics) and optimizer internals;
//!   unit tests cover them.
//! - Coverage frequencies across many seeds; one fixed seed per scenario.

use rust_zipf::{
    power_law::{
        CompiledModel, DiscretePowerLaw, Experiment, ExperimentOptions, FrequencyTable, GammaPrior,
    },
    sampler::PosteriorSampler,
    statistical_tests::goodness_of_fit,
};

#[test]
// Purpose
// -------
// The default recovery study recovers α = 1.5 at every offset, with healthy
// diagnostics and datasets that pass their own χ² check.
//
// Given
// -----
// - ExperimentOptions::default(): α = 1.5, N = 1000, q ∈ {1, 10, 100, 1000},
//   Gamma(0.5, 1) prior, the global compiled model.
//
// Expect
// ------
// - Four rows in offset order.
// - Each posterior mean in [1.3, 1.7], |z| < 4, split-R̂ < 1.05.
// - MLE present and within 3 SE of the posterior mean.
// - χ² p-value > 1e-4 for every dataset.
// - A CSV with a header and four data lines.
fn default_experiment_recovers_shape_at_every_offset() {
    // Arrange
    let experiment = Experiment::new(ExperimentOptions::default());

    // Act
    let report = experiment.run().expect("experiment runs");

    // Assert
    let offsets: Vec<u64> = report.rows().iter().map(|r| r.y_min).collect();
    assert_eq!(offsets, vec![1, 10, 100, 1000]);
    for row in report.rows() {
        let p = &row.posterior;
        assert!((1.3..=1.7).contains(&p.mean), "q = {}: posterior mean {}", row.y_min, p.mean);
        assert!(row.z_score.abs() < 4.0, "q = {}: z = {}", row.y_min, row.z_score);
        assert!(p.r_hat < 1.05, "q = {}: R̂ = {}", row.y_min, p.r_hat);
        assert_eq!(p.draws, 8 * 500);

        let (mle, se) = (row.mle_alpha.expect("MLE"), row.mle_se.expect("SE"));
        assert!((mle - p.mean).abs() < 3.0 * se, "q = {}: MLE {mle} ± {se}", row.y_min);

        let gof = row.gof_p_value.expect("χ² check enabled");
        assert!(gof > 1e-4, "q = {}: χ² p = {gof}", row.y_min);
    }
    assert_eq!(report.to_csv().lines().count(), 5);
}

#[test]
// Purpose
// -------
// The posterior concentrates around the truth as the sample grows.
//
// Given
// -----
// - α = 1.5, q = 1, N = 200 and N = 5000, same seed, χ² check off.
//
// Expect
// ------
// - The posterior sd at N = 5000 is less than half the sd at N = 200.
// - The gap |mean - α| is below 0.25 at N = 200 and below 0.05 at
//   N = 5000.
fn posterior_gap_shrinks_with_sample_size() {
    // Arrange
    let run = |n: usize| {
        let opts = ExperimentOptions::new(1.5, n, vec![1], 99)
            .expect("valid options")
            .with_gof_check(false);
        Experiment::new(opts).run().expect("experiment runs")
    };

    // Act
    let small = run(200);
    let large = run(5000);

    // Assert
    let (s, l) = (&small.rows()[0], &large.rows()[0]);
    assert!(l.posterior.sd < 0.5 * s.posterior.sd, "sd {} vs {}", l.posterior.sd, s.posterior.sd);
    assert!(s.gap() < 0.25, "N = 200 gap {}", s.gap());
    assert!(l.gap() < 0.05, "N = 5000 gap {}", l.gap());
}

#[test]
// Purpose
// -------
// The compiled model answers through the sampler boundary with draws of α.
//
// Given
// -----
// - 1000 draws from α = 2.2, q = 3, aggregated into a SamplerInput with
//   the default prior, passed as `&dyn PosteriorSampler`.
//
// Expect
// ------
// - 8 chains × 500 draws, every draw > 1, pooled mean within 0.2 of 2.2.
fn compiled_model_serves_sampler_boundary() {
    // Arrange
    let law = DiscretePowerLaw::new(2.2, 3).expect("valid law");
    let data = law.sample(1000, 41).expect("draws");
    let prior = GammaPrior::default();
    let input = FrequencyTable::from_dataset(&data)
        .expect("table")
        .to_sampler_input(prior.shape(), prior.rate(), 8);
    let sampler: &dyn PosteriorSampler = CompiledModel::global();

    // Act
    let draws = sampler.sample_posterior(&input).expect("sampling succeeds");

    // Assert
    assert_eq!(draws.num_chains(), 8);
    assert_eq!(draws.draws_per_chain(), 500);
    let pooled = draws.pooled();
    assert!(pooled.iter().all(|&a| a > 1.0));
    let mean = pooled.iter().sum::<f64>() / pooled.len() as f64;
    assert!((mean - 2.2).abs() < 0.2, "posterior mean {mean}");
}

#[test]
// Purpose
// -------
// Truncated generation stays inside the bound and matches the
// renormalized pmf.
//
// Given
// -----
// - α = 1.5, q = 1, upper bound 10 000, N = 3000.
//
// Expect
// ------
// - Every draw in [1, 10 000]; χ² p-value > 1e-4 against the truncated law.
fn truncated_generation_matches_renormalized_law() {
    // Arrange
    let law = DiscretePowerLaw::new(1.5, 1)
        .and_then(|l| l.with_upper_bound(10_000))
        .expect("valid truncated law");

    // Act
    let data = law.sample(3000, 17).expect("draws");
    let gof = goodness_of_fit(&data, &law).expect("test runs");

    // Assert
    assert!(data.values().iter().all(|&v| (1..=10_000).contains(&v)));
    assert!(gof.p_value() > 1e-4, "χ² p = {}", gof.p_value());
}
