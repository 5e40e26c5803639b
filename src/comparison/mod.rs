//! comparison — evaluator-vs-oracle validation harness.
//!
//! Purpose
//! -------
//! Sweep a [`ValidationGrid`] of `(α, q)` cells, evaluate the production
//! [`HurwitzZeta`] evaluator and every supplied [`ZetaOracle`] at each cell,
//! and merge the signed differences into a [`ComparisonReport`].
//!
//! Key behaviors
//! -------------
//! - Cells are independent; they are computed with a rayon parallel map and
//!   merged in grid order at the end.
//! - An evaluator error aborts the sweep (the evaluator must cover the whole
//!   grid). An oracle error is recorded as an [`OracleFailure`] for that cell
//!   and the sweep continues.
//! - Pass/fail uses the explicit [`ValidationTolerances`] (defaults 1e-8 for
//!   values, 1e-5 for derivatives, both relative to the oracle).
//!
//! Conventions
//! -----------
//! - Structured `tracing` events: one `info` per sweep, one `warn` per oracle
//!   failure and per out-of-tolerance cell. No subscriber is installed here.

pub mod errors;
pub mod grid;
pub mod record;
pub mod report;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::{reference::ZetaOracle, zeta::HurwitzZeta};

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::errors::{ComparisonError, ComparisonResult};
pub use self::grid::{ValidationGrid, ValidationTolerances, linspace};
pub use self::record::{ComparisonRecord, OracleFailure};
pub use self::report::{ComparisonReport, QSummary};

enum CellOutcome {
    Record(ComparisonRecord),
    Failure(OracleFailure),
}

/// Evaluate every grid cell with the evaluator and each oracle.
///
/// # Errors
/// - [`ComparisonError::NoOracles`] if `oracles` is empty.
/// - [`ComparisonError::Zeta`] if the evaluator fails on any cell.
pub fn run_comparison(
    grid: &ValidationGrid, evaluator: &HurwitzZeta, oracles: &[&dyn ZetaOracle],
    tolerances: &ValidationTolerances,
) -> ComparisonResult<ComparisonReport> {
    if oracles.is_empty() {
        return Err(ComparisonError::NoOracles);
    }
    info!(cells = grid.len(), oracles = oracles.len(), "running zeta comparison sweep");

    let cells: Vec<(f64, f64)> = grid.cells().collect();
    let per_cell: Vec<Vec<CellOutcome>> = cells
        .par_iter()
        .map(|&(alpha, q)| compare_cell(alpha, q, evaluator, oracles))
        .collect::<ComparisonResult<_>>()?;

    let mut records = Vec::with_capacity(cells.len() * oracles.len());
    let mut failures = Vec::new();
    for outcome in per_cell.into_iter().flatten() {
        match outcome {
            CellOutcome::Record(rec) => {
                if !rec.within(tolerances) {
                    warn!(
                        alpha = rec.alpha,
                        q = rec.q,
                        oracle = rec.oracle,
                        value_rel = rec.value_rel_diff(),
                        derivative_rel = rec.derivative_rel_diff(),
                        "cell outside tolerance"
                    );
                }
                records.push(rec);
            }
            CellOutcome::Failure(fail) => failures.push(fail),
        }
    }

    let report = ComparisonReport::new(records, failures, *tolerances);
    info!(
        records = report.records().len(),
        failing = report.failures().len(),
        oracle_failures = report.oracle_failures().len(),
        passes = report.passes(),
        "zeta comparison sweep finished"
    );
    Ok(report)
}

fn compare_cell(
    alpha: f64, q: f64, evaluator: &HurwitzZeta, oracles: &[&dyn ZetaOracle],
) -> ComparisonResult<Vec<CellOutcome>> {
    let eval = evaluator.evaluate(alpha, q)?;
    Ok(oracles
        .iter()
        .map(|oracle| match oracle.evaluate(alpha, q) {
            Ok(reference) => CellOutcome::Record(ComparisonRecord::new(
                alpha,
                q,
                oracle.name(),
                eval.value,
                reference.value,
                eval.derivative,
                reference.derivative,
                eval.terms,
                eval.converged,
            )),
            Err(err) => {
                warn!(alpha, q, oracle = oracle.name(), error = %err, "oracle failed");
                CellOutcome::Failure(OracleFailure {
                    alpha,
                    q,
                    oracle: oracle.name(),
                    reason: err.to_string(),
                })
            }
        })
        .collect())
}
