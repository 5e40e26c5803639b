//! power_law::data — synthetic datasets and their histogram form.
//!
//! A [`SyntheticDataset`] is the raw draw sequence with its provenance; a
//! [`FrequencyTable`] is the `(value, count)` aggregation the likelihood and
//! the sampler consume. Values never observed do not appear in the table.

use std::collections::BTreeMap;

use crate::{
    power_law::errors::{PowerLawError, PowerLawResult},
    sampler::SamplerInput,
};

/// SyntheticDataset — immutable draws `>= y_min` with their generator.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticDataset {
    values: Vec<u64>,
    alpha_true: f64,
    y_min: u64,
    upper_bound: Option<u64>,
    seed: u64,
}

impl SyntheticDataset {
    pub(crate) fn new(
        values: Vec<u64>, alpha_true: f64, y_min: u64, upper_bound: Option<u64>, seed: u64,
    ) -> Self {
        Self { values, alpha_true, y_min, upper_bound, seed }
    }

    /// Draws in generation order.
    pub fn values(&self) -> &[u64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn alpha_true(&self) -> f64 {
        self.alpha_true
    }

    pub fn y_min(&self) -> u64 {
        self.y_min
    }

    pub fn upper_bound(&self) -> Option<u64> {
        self.upper_bound
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn max(&self) -> Option<u64> {
        self.values.iter().copied().max()
    }
}

/// FrequencyTable — distinct observed values (ascending) with counts.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyTable {
    values: Vec<u64>,
    frequencies: Vec<u64>,
    y_min: u64,
    total: u64,
}

impl FrequencyTable {
    /// Aggregate raw observations.
    ///
    /// # Errors
    /// - [`PowerLawError::InvalidMinimum`] for `y_min == 0`.
    /// - [`PowerLawError::EmptyData`] for no observations.
    /// - [`PowerLawError::ValueBelowMinimum`] for any value `< y_min`.
    pub fn from_values(values: &[u64], y_min: u64) -> PowerLawResult<Self> {
        if y_min == 0 {
            return Err(PowerLawError::InvalidMinimum { value: y_min });
        }
        if values.is_empty() {
            return Err(PowerLawError::EmptyData);
        }
        let mut counts: BTreeMap<u64, u64> = BTreeMap::new();
        for &value in values {
            if value < y_min {
                return Err(PowerLawError::ValueBelowMinimum { value, y_min });
            }
            *counts.entry(value).or_insert(0) += 1;
        }
        let (values, frequencies): (Vec<u64>, Vec<u64>) = counts.into_iter().unzip();
        let total = frequencies.iter().sum();
        Ok(Self { values, frequencies, y_min, total })
    }

    pub fn from_dataset(dataset: &SyntheticDataset) -> PowerLawResult<Self> {
        Self::from_values(dataset.values(), dataset.y_min())
    }

    /// Rebuild from the sampler boundary payload.
    ///
    /// # Errors
    /// - [`PowerLawError::Sampler`] if the payload fails its own validation.
    pub fn from_sampler_input(input: &SamplerInput) -> PowerLawResult<Self> {
        input.validate()?;
        Ok(Self {
            values: input.values.clone(),
            frequencies: input.frequencies.clone(),
            y_min: input.y_min,
            total: input.total_count(),
        })
    }

    pub fn to_sampler_input(&self, prior_shape: f64, prior_rate: f64, seed: u64) -> SamplerInput {
        SamplerInput {
            values: self.values.clone(),
            frequencies: self.frequencies.clone(),
            y_min: self.y_min,
            prior_shape,
            prior_rate,
            seed,
        }
    }

    pub fn values(&self) -> &[u64] {
        &self.values
    }

    pub fn frequencies(&self) -> &[u64] {
        &self.frequencies
    }

    pub fn y_min(&self) -> u64 {
        self.y_min
    }

    /// Number of distinct values `K`.
    pub fn distinct(&self) -> usize {
        self.values.len()
    }

    /// Sample size `n = Σ f_i`.
    pub fn total_count(&self) -> u64 {
        self.total
    }

    /// `Σ f_i ln v_i`, the only data statistic the likelihood needs besides `n`.
    pub fn weighted_log_sum(&self) -> f64 {
        self.values.iter().zip(&self.frequencies).map(|(&v, &f)| f as f64 * (v as f64).ln()).sum()
    }

    /// Closed-form starting shape `1 + n / Σ f_i ln(v_i / (y_min - ½))`.
    pub fn moment_alpha(&self) -> f64 {
        let shift = self.y_min as f64 - 0.5;
        let denom: f64 = self
            .values
            .iter()
            .zip(&self.frequencies)
            .map(|(&v, &f)| f as f64 * (v as f64 / shift).ln())
            .sum();
        1.0 + self.total as f64 / denom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    // Purpose
    // -------
    // Aggregation sorts values, counts repeats and round-trips through the
    // sampler payload.
    //
    // Given
    // -----
    // - Observations [3, 1, 3, 7, 1, 1] with y_min = 1.
    //
    // Expect
    // ------
    // - values [1, 3, 7], frequencies [3, 2, 1], n = 6, K = 3, and the same
    //   table after to/from SamplerInput.
    fn table_aggregates_and_round_trips() {
        // Act
        let table = FrequencyTable::from_values(&[3, 1, 3, 7, 1, 1], 1).expect("valid data");
        let back = FrequencyTable::from_sampler_input(&table.to_sampler_input(0.5, 1.0, 9))
            .expect("valid payload");

        // Assert
        assert_eq!(table.values(), &[1, 3, 7]);
        assert_eq!(table.frequencies(), &[3, 2, 1]);
        assert_eq!(table.total_count(), 6);
        assert_eq!(table.distinct(), 3);
        assert_eq!(back, table);
        assert_relative_eq!(
            table.weighted_log_sum(),
            2.0 * 3.0_f64.ln() + 7.0_f64.ln(),
            max_relative = 1e-15
        );
    }

    #[test]
    // Purpose
    // -------
    // Invalid observations are rejected with the offending value.
    //
    // Given
    // -----
    // - Empty input, y_min = 0, and a value 4 below y_min = 5.
    //
    // Expect
    // ------
    // - EmptyData, InvalidMinimum, ValueBelowMinimum { value: 4, y_min: 5 }.
    fn invalid_observations_are_rejected() {
        // Act / Assert
        assert_eq!(FrequencyTable::from_values(&[], 1), Err(PowerLawError::EmptyData));
        assert_eq!(
            FrequencyTable::from_values(&[1], 0),
            Err(PowerLawError::InvalidMinimum { value: 0 })
        );
        assert_eq!(
            FrequencyTable::from_values(&[5, 4], 5),
            Err(PowerLawError::ValueBelowMinimum { value: 4, y_min: 5 })
        );
    }
}
