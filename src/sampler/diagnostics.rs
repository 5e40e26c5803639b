//! sampler::diagnostics — multi-chain convergence and summary statistics.
//!
//! - [`split_r_hat`]: potential scale reduction over half-chains.
//! - [`effective_sample_size`]: multi-chain ESS with Geyer's initial
//!   monotone positive-sequence truncation of the autocorrelation sum.
//! - [`quantile`]: linear interpolation between order statistics.
//!
//! All functions take chains as slices of equal length.

use crate::sampler::errors::{SamplerError, SamplerResult};

fn mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

fn sample_variance(xs: &[f64]) -> f64 {
    let m = mean(xs);
    xs.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / (xs.len() as f64 - 1.0)
}

fn check_chains(chains: &[&[f64]], min_len: usize) -> SamplerResult<usize> {
    let n = chains.first().map(|c| c.len()).ok_or(SamplerError::EmptyDraws)?;
    if n < min_len {
        return Err(SamplerError::EmptyDraws);
    }
    if chains.iter().any(|c| c.len() != n) {
        return Err(SamplerError::InvalidInput { reason: "Chains must have equal length." });
    }
    Ok(n)
}

/// Split-R̂. Each chain is cut into two halves (dropping the middle draw of
/// odd-length chains) and the classic between/within ratio is computed.
/// Returns 1 when every half-chain is constant and identical.
pub fn split_r_hat(chains: &[&[f64]]) -> SamplerResult<f64> {
    let n = check_chains(chains, 4)?;
    let half = n / 2;
    let halves: Vec<&[f64]> =
        chains.iter().flat_map(|c| [&c[..half], &c[n - half..]]).collect();

    let means: Vec<f64> = halves.iter().map(|h| mean(h)).collect();
    let w = mean(&halves.iter().map(|h| sample_variance(h)).collect::<Vec<_>>());
    let b_over_n = sample_variance(&means);
    if w == 0.0 {
        return Ok(if b_over_n == 0.0 { 1.0 } else { f64::INFINITY });
    }
    let nf = half as f64;
    let var_plus = (nf - 1.0) / nf * w + b_over_n;
    Ok((var_plus / w).sqrt())
}

/// Autocovariance at every lag, normalized by `n` (biased estimator).
fn autocovariance(xs: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let m = mean(xs);
    let centered: Vec<f64> = xs.iter().map(|x| x - m).collect();
    (0..n)
        .map(|lag| {
            centered[..n - lag].iter().zip(&centered[lag..]).map(|(a, b)| a * b).sum::<f64>()
                / n as f64
        })
        .collect()
}

/// Multi-chain effective sample size, capped at `M·n·log10(M·n)`.
pub fn effective_sample_size(chains: &[&[f64]]) -> SamplerResult<f64> {
    let n = check_chains(chains, 4)?;
    let m = chains.len();
    let total = (m * n) as f64;
    let nf = n as f64;

    let acov: Vec<Vec<f64>> = chains.iter().map(|c| autocovariance(c)).collect();
    let chain_means: Vec<f64> = chains.iter().map(|c| mean(c)).collect();
    let mean_var = acov.iter().map(|a| a[0]).sum::<f64>() / m as f64 * nf / (nf - 1.0);
    let b_over_n = if m > 1 { sample_variance(&chain_means) } else { 0.0 };
    let var_plus = mean_var * (nf - 1.0) / nf + b_over_n;
    if !(var_plus > 0.0) {
        return Ok(total);
    }

    let rho = |lag: usize| -> f64 {
        let mean_acov = acov.iter().map(|a| a[lag]).sum::<f64>() / m as f64;
        1.0 - (mean_var - mean_acov) / var_plus
    };

    // Geyer: sum adjacent pairs while positive, enforcing monotone decrease.
    let mut tau = -1.0;
    let mut prev_pair = f64::INFINITY;
    let mut lag = 0;
    while lag + 1 < n {
        let pair = rho(lag) + rho(lag + 1);
        if pair <= 0.0 {
            break;
        }
        let pair = pair.min(prev_pair);
        tau += 2.0 * pair;
        prev_pair = pair;
        lag += 2;
    }

    let ess = total / tau.max(1.0 / total.log10().max(1.0));
    Ok(ess.min(total * total.log10()))
}

/// Quantile `p ∈ [0, 1]` of already-sorted data (R type 7).
pub fn quantile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let h = (n - 1) as f64 * p.clamp(0.0, 1.0);
            let lo = h.floor() as usize;
            let hi = (lo + 1).min(n - 1);
            sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
        }
    }
}
