//! statistical_tests::goodness_of_fit — Pearson χ² test for integer samples.
//!
//! Purpose
//! -------
//! Check that a sample of integers `>= y_min` is consistent with a given
//! probability mass function. Used to validate synthetic power-law datasets
//! against the analytic pmf they were drawn from.
//!
//! Key behaviors
//! -------------
//! - Walks the support upward from `y_min`, closing a bin whenever its
//!   expected count reaches `min_expected`.
//! - Everything beyond the point where the remaining tail expectation drops
//!   below `min_expected` is pooled into one final bin, whose expected count
//!   is `n · (1 - F(k))`. Heavy tails therefore never need to be enumerated.
//! - An undersized final bin is merged into its predecessor.
//! - Degrees of freedom are `bins - 1 - estimated`; the p-value is the
//!   upper tail of `χ²(dof)` from `statrs`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The pmf sums to one over `[y_min, ∞)`; truncated laws return zero mass
//!   beyond their upper bound.
//! - The support walk is capped at [`MAX_SUPPORT_WALK`] points; the rest of
//!   the support then lands in the tail bin.

use std::collections::BTreeMap;

use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::{
    power_law::{DiscretePowerLaw, SyntheticDataset},
    statistical_tests::{
        errors::{GofError, GofResult},
        validation::validate_input,
    },
};

/// Conventional minimum expected count per pooled bin.
pub const DEFAULT_MIN_EXPECTED: f64 = 5.0;
/// Upper limit on support points visited before pooling the remainder.
pub const MAX_SUPPORT_WALK: u64 = 1_000_000;

/// GofOutcome — result of a Pearson χ² goodness-of-fit test.
///
/// Fields
/// ------
/// - `stat`: Pearson statistic Σ (O - E)² / E over the pooled bins.
/// - `dof`: degrees of freedom `bins - 1 - estimated`.
/// - `p_value`: upper-tail probability of `stat` under `χ²(dof)`.
/// - `bins`: number of pooled bins.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GofOutcome {
    stat: f64,
    dof: usize,
    p_value: f64,
    bins: usize,
}

impl GofOutcome {
    /// Run the χ² test of `values` against `pmf` on `[y_min, ∞)`.
    ///
    /// Parameters
    /// ----------
    /// - `values`: `&[u64]`
    ///   Observations, all `>= y_min`.
    /// - `y_min`: `u64`
    ///   Smallest support point.
    /// - `pmf`: `Fn(u64) -> f64`
    ///   Probability mass at each support point.
    /// - `min_expected`: `f64`
    ///   Pooling threshold for expected counts.
    /// - `estimated`: `usize`
    ///   Number of parameters fitted from `values`; each removes one degree
    ///   of freedom.
    ///
    /// Errors
    /// ------
    /// - Input errors from [`validate_input`].
    /// - `GofError::InvalidPmf` for a negative or non-finite mass.
    /// - `GofError::InsufficientBins` when pooling leaves `dof < 1`.
    pub fn chi_squared<F>(
        values: &[u64], y_min: u64, pmf: F, min_expected: f64, estimated: usize,
    ) -> GofResult<Self>
    where
        F: Fn(u64) -> f64,
    {
        validate_input(values, y_min, min_expected)?;
        let bins = pool_bins(values, y_min, &pmf, min_expected)?;
        let n_bins = bins.len();
        let dof = n_bins
            .checked_sub(1 + estimated)
            .filter(|&d| d > 0)
            .ok_or(GofError::InsufficientBins { bins: n_bins, estimated })?;

        let stat: f64 = bins.iter().map(|b| (b.observed - b.expected).powi(2) / b.expected).sum();
        let p_value = ChiSquared::new(dof as f64)
            .map_err(|_| GofError::InsufficientBins { bins: n_bins, estimated })?
            .sf(stat);

        Ok(GofOutcome { stat, dof, p_value, bins: n_bins })
    }

    /// Pearson statistic Σ (O - E)² / E.
    pub fn stat(&self) -> f64 {
        self.stat
    }

    pub fn dof(&self) -> usize {
        self.dof
    }

    /// Upper-tail `χ²(dof)` p-value of [`stat`](Self::stat).
    pub fn p_value(&self) -> f64 {
        self.p_value
    }

    pub fn bins(&self) -> usize {
        self.bins
    }
}

/// χ² test of a synthetic dataset against a fully specified power law.
///
/// No parameters are estimated, so `dof = bins - 1`. Observations outside
/// the law's support surface as [`GofError::ValueBelowSupport`].
pub fn goodness_of_fit(
    dataset: &SyntheticDataset, dist: &DiscretePowerLaw,
) -> GofResult<GofOutcome> {
    GofOutcome::chi_squared(
        dataset.values(),
        dist.y_min(),
        |k| dist.pmf(k),
        DEFAULT_MIN_EXPECTED,
        0,
    )
}

//
// ---------- Private helpers ----------
//

#[derive(Debug, Clone, Copy, Default)]
struct Bin {
    observed: f64,
    expected: f64,
}

fn pool_bins<F: Fn(u64) -> f64>(
    values: &[u64], y_min: u64, pmf: &F, min_expected: f64,
) -> GofResult<Vec<Bin>> {
    let n = values.len() as f64;
    let mut counts: BTreeMap<u64, u64> = BTreeMap::new();
    for &v in values {
        *counts.entry(v).or_insert(0) += 1;
    }

    let mut bins: Vec<Bin> = Vec::new();
    let mut open = Bin::default();
    let mut seen = 0.0;
    let mut cumulative = 0.0;
    let mut k = y_min;
    let tail_expected = loop {
        let p = pmf(k);
        if !p.is_finite() || p < 0.0 {
            return Err(GofError::InvalidPmf { k, value: p });
        }
        let observed = counts.get(&k).copied().unwrap_or(0) as f64;
        cumulative += p;
        open.expected += n * p;
        open.observed += observed;
        seen += observed;

        let tail = n * (1.0 - cumulative).max(0.0);
        let walked = k - y_min + 1;
        if tail < min_expected || walked >= MAX_SUPPORT_WALK || k == u64::MAX {
            break tail;
        }
        if open.expected >= min_expected {
            bins.push(std::mem::take(&mut open));
        }
        k += 1;
    };

    open.observed += n - seen;
    open.expected += tail_expected;
    match bins.last_mut() {
        Some(last) if open.expected < min_expected => {
            last.observed += open.observed;
            last.expected += open.expected;
        }
        _ => bins.push(open),
    }
    Ok(bins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Exact statistics on a hand-checkable uniform law.
    // - Tail pooling and degrees of freedom.
    // - Acceptance of correctly generated power-law data and rejection of a
    //   mismatched shape.
    //
    // They intentionally DO NOT cover:
    // - Size or power of the test across many seeds; one seed per case is
    //   enough to pin the behavior.
    // -------------------------------------------------------------------------

    fn uniform_ten(k: u64) -> f64 {
        if (1..=10).contains(&k) { 0.1 } else { 0.0 }
    }

    #[test]
    // Purpose
    // -------
    // A perfectly balanced sample gives a zero statistic.
    //
    // Given
    // -----
    // - 100 observations, 10 at each of 1..=10, tested against U{1..10}.
    //
    // Expect
    // ------
    // - 10 bins, dof 9, stat ≈ 0, p ≈ 1.
    fn balanced_sample_has_zero_statistic() {
        // Arrange
        let values: Vec<u64> = (1..=10).flat_map(|k| std::iter::repeat_n(k, 10)).collect();

        // Act
        let out = GofOutcome::chi_squared(&values, 1, uniform_ten, 5.0, 0).expect("test runs");

        // Assert
        assert_eq!(out.bins(), 10);
        assert_eq!(out.dof(), 9);
        assert!(out.stat() < 1e-9, "stat {}", out.stat());
        assert!(out.p_value() > 0.999);
    }

    #[test]
    // Purpose
    // -------
    // The statistic and p-value follow Pearson's formula.
    //
    // Given
    // -----
    // - 20 observations of 1, none of 2, 10 of each of 3..=10 (n = 100).
    //
    // Expect
    // ------
    // - stat = 10²/10 + 10²/10 = 20 and p = P(χ²₉ > 20).
    fn skewed_sample_matches_pearson_formula() {
        // Arrange
        let mut values: Vec<u64> = std::iter::repeat_n(1, 20).collect();
        values.extend((3..=10).flat_map(|k| std::iter::repeat_n(k, 10)));

        // Act
        let out = GofOutcome::chi_squared(&values, 1, uniform_ten, 5.0, 0).expect("test runs");

        // Assert
        assert_relative_eq!(out.stat(), 20.0, max_relative = 1e-9);
        let expected_p = ChiSquared::new(9.0).expect("valid dof").sf(20.0);
        assert_relative_eq!(out.p_value(), expected_p, max_relative = 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // Pooling and estimated parameters can exhaust the degrees of freedom.
    //
    // Given
    // -----
    // - 12 observations against U{1..10}: every single point expects 1.2,
    //   so pooling at 5 leaves two bins; one parameter is marked estimated.
    //
    // Expect
    // ------
    // - InsufficientBins { bins: 2, estimated: 1 }.
    fn pooling_can_leave_no_degrees_of_freedom() {
        // Arrange
        let values: Vec<u64> = (1..=10).chain([1, 2]).collect();

        // Act
        let result = GofOutcome::chi_squared(&values, 1, uniform_ten, 5.0, 1);

        // Assert
        assert_eq!(result, Err(GofError::InsufficientBins { bins: 2, estimated: 1 }));
    }

    #[test]
    // Purpose
    // -------
    // Generated power-law data passes against its own pmf and fails against
    // a different shape.
    //
    // Given
    // -----
    // - 5000 draws from α = 2.5, y_min = 1, seed 11.
    //
    // Expect
    // ------
    // - p > 1e-3 against α = 2.5; p < 1e-6 against α = 1.8.
    fn power_law_sample_passes_own_law_only() {
        // Arrange
        let truth = DiscretePowerLaw::new(2.5, 1).expect("valid law");
        let wrong = DiscretePowerLaw::new(1.8, 1).expect("valid law");
        let data = truth.sample(5000, 11).expect("draws");

        // Act
        let own = goodness_of_fit(&data, &truth).expect("test runs");
        let other = goodness_of_fit(&data, &wrong).expect("test runs");

        // Assert
        assert!(own.p_value() > 1e-3, "own p = {}", own.p_value());
        assert!(other.p_value() < 1e-6, "mismatched p = {}", other.p_value());
        assert!(own.bins() > 3);
    }
}
