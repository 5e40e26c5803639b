//! comparison::record — one evaluator/oracle diff.

use crate::comparison::grid::ValidationTolerances;

/// ComparisonRecord — evaluator and oracle outputs at one `(α, q)` cell.
///
/// Differences are signed `evaluator - oracle`. Relative differences divide
/// by `|oracle|`, falling back to the absolute difference when the oracle
/// value is exactly zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRecord {
    pub alpha: f64,
    pub q: f64,
    pub oracle: &'static str,
    pub evaluator_value: f64,
    pub oracle_value: f64,
    pub evaluator_derivative: f64,
    pub oracle_derivative: f64,
    pub value_diff: f64,
    pub derivative_diff: f64,
    /// Direct terms the evaluator used for this cell.
    pub terms: usize,
    pub converged: bool,
}

impl ComparisonRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        alpha: f64, q: f64, oracle: &'static str, evaluator_value: f64, oracle_value: f64,
        evaluator_derivative: f64, oracle_derivative: f64, terms: usize, converged: bool,
    ) -> Self {
        Self {
            alpha,
            q,
            oracle,
            evaluator_value,
            oracle_value,
            evaluator_derivative,
            oracle_derivative,
            value_diff: evaluator_value - oracle_value,
            derivative_diff: evaluator_derivative - oracle_derivative,
            terms,
            converged,
        }
    }

    pub fn value_rel_diff(&self) -> f64 {
        relative(self.value_diff, self.oracle_value)
    }

    pub fn derivative_rel_diff(&self) -> f64 {
        relative(self.derivative_diff, self.oracle_derivative)
    }

    /// Both relative differences are within tolerance. NaN never passes.
    pub fn within(&self, tol: &ValidationTolerances) -> bool {
        self.value_rel_diff() <= tol.value_rel && self.derivative_rel_diff() <= tol.derivative_rel
    }
}

fn relative(diff: f64, reference: f64) -> f64 {
    if reference == 0.0 { diff.abs() } else { (diff / reference).abs() }
}

/// OracleFailure — a cell the oracle could not evaluate.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleFailure {
    pub alpha: f64,
    pub q: f64,
    pub oracle: &'static str,
    pub reason: String,
}
