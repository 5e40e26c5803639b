//! comparison::grid — the (α, q) sweep and its pass/fail thresholds.

use crate::comparison::errors::{ComparisonError, ComparisonResult};

/// Offsets exercised by the default grid (`y_min` values of the power-law runs).
pub const DEFAULT_OFFSETS: [f64; 4] = [1.0, 10.0, 100.0, 1000.0];

pub const DEFAULT_VALUE_REL_TOL: f64 = 1e-8;
pub const DEFAULT_DERIVATIVE_REL_TOL: f64 = 1e-5;

/// `n` evenly spaced points from `start` to `stop` inclusive.
///
/// # Errors
/// - [`ComparisonError::InvalidLinspace`] if `n == 0`, an endpoint is not
///   finite, or `n == 1` with distinct endpoints.
pub fn linspace(start: f64, stop: f64, n: usize) -> ComparisonResult<Vec<f64>> {
    if !start.is_finite() || !stop.is_finite() {
        return Err(ComparisonError::InvalidLinspace { reason: "Endpoints must be finite." });
    }
    match n {
        0 => Err(ComparisonError::InvalidLinspace { reason: "Need at least one point." }),
        1 if start != stop => Err(ComparisonError::InvalidLinspace {
            reason: "A single point requires start == stop.",
        }),
        1 => Ok(vec![start]),
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            // Pin the last point so rounding never moves it past `stop`.
            Ok((0..n).map(|i| if i == n - 1 { stop } else { start + step * i as f64 }).collect())
        }
    }
}

/// ValidationGrid — Cartesian product of shape values and offsets.
///
/// Cells are visited offset-major (`q` outer, `α` inner), which is also the
/// order records appear in a report.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationGrid {
    alphas: Vec<f64>,
    offsets: Vec<f64>,
}

impl ValidationGrid {
    /// # Errors
    /// - [`ComparisonError::EmptyGrid`] if either axis is empty.
    /// - [`ComparisonError::InvalidGridValue`] for a non-finite or non-positive
    ///   entry, or α exactly 1.
    pub fn new(alphas: Vec<f64>, offsets: Vec<f64>) -> ComparisonResult<Self> {
        if alphas.is_empty() || offsets.is_empty() {
            return Err(ComparisonError::EmptyGrid);
        }
        for &alpha in &alphas {
            if !alpha.is_finite() || alpha <= 0.0 {
                return Err(ComparisonError::InvalidGridValue {
                    axis: "alpha",
                    value: alpha,
                    reason: "Shape must be finite and positive.",
                });
            }
            if alpha == 1.0 {
                return Err(ComparisonError::InvalidGridValue {
                    axis: "alpha",
                    value: alpha,
                    reason: "The pole alpha = 1 has no finite value.",
                });
            }
        }
        for &q in &offsets {
            if !q.is_finite() || q <= 0.0 {
                return Err(ComparisonError::InvalidGridValue {
                    axis: "q",
                    value: q,
                    reason: "Offset must be finite and positive.",
                });
            }
        }
        Ok(Self { alphas, offsets })
    }

    pub fn alphas(&self) -> &[f64] {
        &self.alphas
    }

    pub fn offsets(&self) -> &[f64] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.alphas.len() * self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(α, q)` pairs in report order.
    pub fn cells(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.offsets.iter().flat_map(move |&q| self.alphas.iter().map(move |&alpha| (alpha, q)))
    }
}

impl Default for ValidationGrid {
    /// `linspace(1.5, 100, 50) × {1, 10, 100, 1000}`.
    fn default() -> Self {
        let step = (100.0 - 1.5) / 49.0;
        let alphas = (0..50).map(|i| if i == 49 { 100.0 } else { 1.5 + step * i as f64 }).collect();
        Self { alphas, offsets: DEFAULT_OFFSETS.to_vec() }
    }
}

/// ValidationTolerances — relative thresholds a cell must meet to pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationTolerances {
    pub value_rel: f64,
    pub derivative_rel: f64,
}

impl ValidationTolerances {
    pub fn new(value_rel: f64, derivative_rel: f64) -> ComparisonResult<Self> {
        if !value_rel.is_finite() || value_rel <= 0.0 {
            return Err(ComparisonError::InvalidTolerance { name: "value_rel", value: value_rel });
        }
        if !derivative_rel.is_finite() || derivative_rel <= 0.0 {
            return Err(ComparisonError::InvalidTolerance {
                name: "derivative_rel",
                value: derivative_rel,
            });
        }
        Ok(Self { value_rel, derivative_rel })
    }
}

impl Default for ValidationTolerances {
    fn default() -> Self {
        Self { value_rel: DEFAULT_VALUE_REL_TOL, derivative_rel: DEFAULT_DERIVATIVE_REL_TOL }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    // Purpose
    // -------
    // The default grid is the documented 50 × 4 sweep.
    //
    // Given
    // -----
    // - `ValidationGrid::default()`.
    //
    // Expect
    // ------
    // - 200 cells, α from 1.5 to exactly 100, offsets {1, 10, 100, 1000},
    //   and the same α axis as `linspace(1.5, 100, 50)`.
    fn default_grid_matches_linspace_sweep() {
        // Arrange
        let grid = ValidationGrid::default();

        // Act
        let expected = linspace(1.5, 100.0, 50).expect("valid linspace");
        let first = grid.cells().next();

        // Assert
        assert_eq!(grid.len(), 200);
        assert_eq!(grid.offsets(), &DEFAULT_OFFSETS);
        assert_eq!(grid.alphas().len(), 50);
        assert_eq!(grid.alphas()[49], 100.0);
        for (a, b) in grid.alphas().iter().zip(&expected) {
            assert_relative_eq!(*a, *b, max_relative = 1e-15);
        }
        assert_eq!(first, Some((1.5, 1.0)));
    }

    #[test]
    // Purpose
    // -------
    // Invalid axes and tolerances are rejected.
    //
    // Given
    // -----
    // - An empty α axis, α = 1, q = 0, a zero tolerance, linspace with n = 0.
    //
    // Expect
    // ------
    // - The matching error variant for each.
    fn invalid_configuration_is_rejected() {
        // Act / Assert
        assert_eq!(ValidationGrid::new(vec![], vec![1.0]), Err(ComparisonError::EmptyGrid));
        assert!(matches!(
            ValidationGrid::new(vec![1.0], vec![1.0]),
            Err(ComparisonError::InvalidGridValue { axis: "alpha", .. })
        ));
        assert!(matches!(
            ValidationGrid::new(vec![2.0], vec![0.0]),
            Err(ComparisonError::InvalidGridValue { axis: "q", .. })
        ));
        assert!(matches!(
            ValidationTolerances::new(0.0, 1e-5),
            Err(ComparisonError::InvalidTolerance { name: "value_rel", .. })
        ));
        assert!(matches!(linspace(0.0, 1.0, 0), Err(ComparisonError::InvalidLinspace { .. })));
    }
}
