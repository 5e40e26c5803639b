//! statistical_tests::validation — shared input guards for count tests.
//!
//! Purpose
//! -------
//! Check the sample and tuning constants once, before any binning work, so
//! every test routine reports the same [`GofError`] for the same mistake.
//!
//! Invariants & assumptions
//! ------------------------
//! - The sample is non-empty and every observation is `>= y_min`.
//! - The pooling threshold `min_expected` is finite and strictly positive.

use crate::statistical_tests::errors::{GofError, GofResult};

/// Validate a sample of integer observations for a count-based test.
///
/// Parameters
/// ----------
/// - `values`: `&[u64]`
///   Observations; must be non-empty and all `>= y_min`.
/// - `y_min`: `u64`
///   Smallest point of the hypothesized support.
/// - `min_expected`: `f64`
///   Minimum expected count per pooled bin.
///
/// Errors
/// ------
/// - `GofError::EmptySample` for an empty sample.
/// - `GofError::ValueBelowSupport` for the first observation below `y_min`.
/// - `GofError::InvalidMinExpected` for a non-finite or non-positive
///   threshold.
pub fn validate_input(values: &[u64], y_min: u64, min_expected: f64) -> GofResult<()> {
    if values.is_empty() {
        return Err(GofError::EmptySample);
    }
    if !min_expected.is_finite() || min_expected <= 0.0 {
        return Err(GofError::InvalidMinExpected(min_expected));
    }
    if let Some(&value) = values.iter().find(|&&v| v < y_min) {
        return Err(GofError::ValueBelowSupport { value, y_min });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Every guard fires on its own input and a clean sample passes.
    //
    // Given
    // -----
    // - An empty sample, a zero threshold, a value below y_min, and a valid
    //   sample.
    //
    // Expect
    // ------
    // - EmptySample, InvalidMinExpected(0), ValueBelowSupport{2, 3}, Ok.
    fn validate_input_covers_each_branch() {
        // Act / Assert
        assert_eq!(validate_input(&[], 1, 5.0), Err(GofError::EmptySample));
        assert_eq!(validate_input(&[3, 4], 1, 0.0), Err(GofError::InvalidMinExpected(0.0)));
        assert_eq!(
            validate_input(&[3, 2, 5], 3, 5.0),
            Err(GofError::ValueBelowSupport { value: 2, y_min: 3 })
        );
        assert_eq!(validate_input(&[3, 3, 9], 3, 5.0), Ok(()));
    }
}
