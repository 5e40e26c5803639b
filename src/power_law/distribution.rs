//! power_law::distribution — the discrete power law on `{y_min, y_min + 1, …}`.
//!
//! ```text
//! P(X = k) = k^{-α} / Z,   Z = ζ(α, y_min)                  (untruncated)
//!                          Z = ζ(α, y_min) - ζ(α, b + 1)    (support capped at b)
//! P(X ≥ k) = Σ_{j ≥ k} j^{-α} / Z
//! ```
//!
//! Every normalizer and tail mass goes through the same [`HurwitzZeta`]
//! handle the likelihood uses. Finite ranges shorter than
//! [`DIRECT_SUM_LIMIT`] are summed directly instead of differenced.
//!
//! Sampling is by inversion of the survival function: the smallest `k` with
//! `P(X > k) <= v`, `v ~ U(0, 1]`, is bracketed by doubling and then located
//! by integer bisection. Untruncated draws are capped at
//! [`UNTRUNCATED_CAP`] (`2^53`, the last integer exactly representable in
//! `f64`).

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::{
    power_law::{
        data::SyntheticDataset,
        errors::{PowerLawError, PowerLawResult},
    },
    zeta::{HurwitzZeta, partial_sums},
};

/// Largest value an untruncated draw can take.
pub const UNTRUNCATED_CAP: u64 = 1 << 53;

/// Finite ranges up to this many terms are summed term by term.
pub const DIRECT_SUM_LIMIT: u64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscretePowerLaw {
    alpha: f64,
    y_min: u64,
    upper: Option<u64>,
    evaluator: HurwitzZeta,
    normalizer: f64,
}

impl DiscretePowerLaw {
    /// Untruncated law with the default evaluator.
    ///
    /// # Errors
    /// - [`PowerLawError::InvalidShape`] unless `α` is finite and `> 1`.
    /// - [`PowerLawError::InvalidMinimum`] for `y_min == 0`.
    /// - [`PowerLawError::Zeta`] if the normalizer cannot be evaluated.
    pub fn new(alpha: f64, y_min: u64) -> PowerLawResult<Self> {
        Self::with_evaluator(alpha, y_min, HurwitzZeta::default())
    }

    pub fn with_evaluator(alpha: f64, y_min: u64, evaluator: HurwitzZeta) -> PowerLawResult<Self> {
        if !alpha.is_finite() || alpha <= 1.0 {
            return Err(PowerLawError::InvalidShape {
                value: alpha,
                reason: "The power law is normalizable only for finite alpha > 1.",
            });
        }
        if y_min == 0 {
            return Err(PowerLawError::InvalidMinimum { value: y_min });
        }
        let normalizer = evaluator.value(alpha, y_min as f64)?;
        Ok(Self { alpha, y_min, upper: None, evaluator, normalizer })
    }

    /// Restrict the support to `[y_min, upper]` and renormalize.
    ///
    /// # Errors
    /// - [`PowerLawError::InvalidUpperBound`] if `upper < y_min` or
    ///   `upper >= 2^53`.
    pub fn with_upper_bound(mut self, upper: u64) -> PowerLawResult<Self> {
        if upper < self.y_min || upper >= UNTRUNCATED_CAP {
            return Err(PowerLawError::InvalidUpperBound { upper, y_min: self.y_min });
        }
        self.upper = Some(upper);
        self.normalizer = self.mass_between(self.y_min, upper)?;
        Ok(self)
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn y_min(&self) -> u64 {
        self.y_min
    }

    pub fn upper_bound(&self) -> Option<u64> {
        self.upper
    }

    /// `Z`, the sum of `k^{-α}` over the support.
    pub fn normalizer(&self) -> f64 {
        self.normalizer
    }

    pub fn in_support(&self, k: u64) -> bool {
        k >= self.y_min && self.upper.is_none_or(|b| k <= b)
    }

    /// `ln P(X = k)`; `-∞` outside the support.
    pub fn ln_pmf(&self, k: u64) -> f64 {
        if self.in_support(k) {
            -self.alpha * (k as f64).ln() - self.normalizer.ln()
        } else {
            f64::NEG_INFINITY
        }
    }

    pub fn pmf(&self, k: u64) -> f64 {
        self.ln_pmf(k).exp()
    }

    /// `P(X >= k)`.
    pub fn sf(&self, k: u64) -> PowerLawResult<f64> {
        if k <= self.y_min {
            return Ok(1.0);
        }
        Ok((self.mass_from(k)? / self.normalizer).clamp(0.0, 1.0))
    }

    /// `P(X <= k)`.
    pub fn cdf(&self, k: u64) -> PowerLawResult<f64> {
        if k < self.y_min {
            return Ok(0.0);
        }
        Ok(1.0 - self.sf(k.saturating_add(1))?)
    }

    /// Draw `n` values by inversion with a `Xoshiro256PlusPlus` stream
    /// seeded from `seed`.
    ///
    /// # Errors
    /// - [`PowerLawError::InvalidSampleSize`] for `n == 0`.
    /// - [`PowerLawError::Zeta`] if a tail mass cannot be evaluated.
    pub fn sample(&self, n: usize, seed: u64) -> PowerLawResult<SyntheticDataset> {
        if n == 0 {
            return Err(PowerLawError::InvalidSampleSize { n });
        }
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut values = Vec::with_capacity(n);
        for _ in 0..n {
            let u: f64 = rng.random();
            values.push(self.quantile_of_survival(1.0 - u)?);
        }
        Ok(SyntheticDataset::new(values, self.alpha, self.y_min, self.upper, seed))
    }

    /// Smallest `k` in the support with `P(X > k) <= v`.
    fn quantile_of_survival(&self, v: f64) -> PowerLawResult<u64> {
        let target = v * self.normalizer;
        let top = self.upper.unwrap_or(UNTRUNCATED_CAP);
        let settled = |k: u64| -> PowerLawResult<bool> {
            Ok(k >= top || self.mass_from(k + 1)? <= target)
        };

        let mut lo = self.y_min;
        if settled(lo)? {
            return Ok(lo);
        }
        // Invariant: the answer lies in (lo, hi].
        let mut step = 1_u64;
        let mut hi = lo + 1;
        while !settled(hi)? {
            lo = hi;
            step = step.saturating_mul(2);
            hi = lo.saturating_add(step).min(top);
        }
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            if settled(mid)? {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        Ok(hi)
    }

    /// `Σ_{j >= k, j in support} j^{-α}`.
    fn mass_from(&self, k: u64) -> PowerLawResult<f64> {
        match self.upper {
            Some(b) if k > b => Ok(0.0),
            Some(b) => self.mass_between(k, b),
            None => Ok(self.evaluator.value(self.alpha, k as f64)?),
        }
    }

    /// `Σ_{j = lo}^{hi} j^{-α}` for `lo <= hi`.
    fn mass_between(&self, lo: u64, hi: u64) -> PowerLawResult<f64> {
        let count = hi - lo + 1;
        if count <= DIRECT_SUM_LIMIT {
            return Ok(partial_sums(self.alpha, lo as f64, count as usize)?.value);
        }
        let head = self.evaluator.value(self.alpha, lo as f64)?;
        let tail = self.evaluator.value(self.alpha, (hi + 1) as f64)?;
        Ok(head - tail)
    }
}
