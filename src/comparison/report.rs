//! comparison::report — per-offset summaries, pass/fail, and the CSV artifact.

use std::fmt::{self, Write as _};

use crate::comparison::{
    grid::ValidationTolerances,
    record::{ComparisonRecord, OracleFailure},
};

/// QSummary — worst-case differences for one `(oracle, q)` slice of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct QSummary {
    pub oracle: &'static str,
    pub q: f64,
    pub cells: usize,
    pub max_abs_value_diff: f64,
    pub max_rel_value_diff: f64,
    pub max_abs_derivative_diff: f64,
    pub max_rel_derivative_diff: f64,
    /// α at which the relative value difference peaks.
    pub worst_value_alpha: f64,
    /// α at which the relative derivative difference peaks.
    pub worst_derivative_alpha: f64,
    pub failures: usize,
}

impl QSummary {
    fn empty(oracle: &'static str, q: f64) -> Self {
        Self {
            oracle,
            q,
            cells: 0,
            max_abs_value_diff: 0.0,
            max_rel_value_diff: 0.0,
            max_abs_derivative_diff: 0.0,
            max_rel_derivative_diff: 0.0,
            worst_value_alpha: f64::NAN,
            worst_derivative_alpha: f64::NAN,
            failures: 0,
        }
    }

    fn absorb(&mut self, rec: &ComparisonRecord, tol: &ValidationTolerances) {
        self.cells += 1;
        self.max_abs_value_diff = nan_max(self.max_abs_value_diff, rec.value_diff.abs());
        self.max_abs_derivative_diff =
            nan_max(self.max_abs_derivative_diff, rec.derivative_diff.abs());

        let rel_v = rec.value_rel_diff();
        if self.cells == 1 || worse(rel_v, self.max_rel_value_diff) {
            self.max_rel_value_diff = rel_v;
            self.worst_value_alpha = rec.alpha;
        }
        let rel_d = rec.derivative_rel_diff();
        if self.cells == 1 || worse(rel_d, self.max_rel_derivative_diff) {
            self.max_rel_derivative_diff = rel_d;
            self.worst_derivative_alpha = rec.alpha;
        }
        if !rec.within(tol) {
            self.failures += 1;
        }
    }
}

/// NaN outranks every number so a broken cell is never hidden.
fn worse(candidate: f64, current: f64) -> bool {
    (candidate.is_nan() && !current.is_nan()) || candidate > current
}

/// Max that propagates NaN.
fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() { f64::NAN } else { a.max(b) }
}

/// ComparisonReport — merged outcome of a grid sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    records: Vec<ComparisonRecord>,
    oracle_failures: Vec<OracleFailure>,
    tolerances: ValidationTolerances,
}

impl ComparisonReport {
    pub fn new(
        records: Vec<ComparisonRecord>, oracle_failures: Vec<OracleFailure>,
        tolerances: ValidationTolerances,
    ) -> Self {
        Self { records, oracle_failures, tolerances }
    }

    pub fn records(&self) -> &[ComparisonRecord] {
        &self.records
    }

    pub fn oracle_failures(&self) -> &[OracleFailure] {
        &self.oracle_failures
    }

    pub fn tolerances(&self) -> &ValidationTolerances {
        &self.tolerances
    }

    /// Records outside tolerance, in grid order.
    pub fn failures(&self) -> Vec<&ComparisonRecord> {
        self.records.iter().filter(|r| !r.within(&self.tolerances)).collect()
    }

    /// Every record is within tolerance and every oracle call succeeded.
    pub fn passes(&self) -> bool {
        self.oracle_failures.is_empty() && self.records.iter().all(|r| r.within(&self.tolerances))
    }

    /// One summary per `(oracle, q)`, ordered by oracle name then offset.
    pub fn q_summaries(&self) -> Vec<QSummary> {
        let mut out: Vec<QSummary> = Vec::new();
        for rec in &self.records {
            let idx = match out.iter().position(|s| s.oracle == rec.oracle && s.q == rec.q) {
                Some(i) => i,
                None => {
                    out.push(QSummary::empty(rec.oracle, rec.q));
                    out.len() - 1
                }
            };
            out[idx].absorb(rec, &self.tolerances);
        }
        out.sort_by(|a, b| a.oracle.cmp(b.oracle).then(a.q.total_cmp(&b.q)));
        out
    }

    /// Per-cell artifact with a header row, one line per record.
    pub fn to_csv(&self) -> String {
        let mut out = String::from(
            "alpha,q,oracle,evaluator_value,oracle_value,value_diff,value_rel_diff,\
             evaluator_derivative,oracle_derivative,derivative_diff,derivative_rel_diff,\
             terms,converged,pass\n",
        );
        for r in &self.records {
            // Writing into a String cannot fail.
            let _ = writeln!(
                out,
                "{},{},{},{:e},{:e},{:e},{:e},{:e},{:e},{:e},{:e},{},{},{}",
                r.alpha,
                r.q,
                r.oracle,
                r.evaluator_value,
                r.oracle_value,
                r.value_diff,
                r.value_rel_diff(),
                r.evaluator_derivative,
                r.oracle_derivative,
                r.derivative_diff,
                r.derivative_rel_diff(),
                r.terms,
                r.converged,
                r.within(&self.tolerances),
            );
        }
        out
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<16} {:>8} {:>6} {:>12} {:>12} {:>12} {:>12} {:>6}",
            "oracle", "q", "cells", "max|dv|", "max rel dv", "max|dd|", "max rel dd", "fail"
        )?;
        for s in self.q_summaries() {
            writeln!(
                f,
                "{:<16} {:>8} {:>6} {:>12.3e} {:>12.3e} {:>12.3e} {:>12.3e} {:>6}",
                s.oracle,
                s.q,
                s.cells,
                s.max_abs_value_diff,
                s.max_rel_value_diff,
                s.max_abs_derivative_diff,
                s.max_rel_derivative_diff,
                s.failures
            )?;
        }
        write!(
            f,
            "tolerances: value {:e}, derivative {:e}; oracle failures: {}; {}",
            self.tolerances.value_rel,
            self.tolerances.derivative_rel,
            self.oracle_failures.len(),
            if self.passes() { "PASS" } else { "FAIL" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn record(alpha: f64, q: f64, v_err: f64, d_err: f64) -> ComparisonRecord {
        ComparisonRecord::new(alpha, q, "mock", 1.0 + v_err, 1.0, -1.0 + d_err, -1.0, 5, true)
    }

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Summary aggregation per (oracle, q), failures and the overall verdict.
    // - The CSV artifact shape.
    //
    // They intentionally DO NOT cover:
    // - Real evaluator/oracle numbers (integration tests).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Summaries track the worst cell per offset and count failures.
    //
    // Given
    // -----
    // - q = 1: two clean cells; q = 10: one cell with a 1e-6 value error.
    //
    // Expect
    // ------
    // - Two summaries ordered by q; the q = 10 summary has one failure with
    //   worst α = 3; the report does not pass and lists one failure.
    fn summaries_track_worst_cells() {
        // Arrange
        let report = ComparisonReport::new(
            vec![
                record(2.0, 1.0, 1e-12, 0.0),
                record(3.0, 1.0, 2e-12, 0.0),
                record(3.0, 10.0, 1e-6, 0.0),
            ],
            vec![],
            ValidationTolerances::default(),
        );

        // Act
        let summaries = report.q_summaries();

        // Assert
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].q, 1.0);
        assert_eq!(summaries[0].cells, 2);
        assert_eq!(summaries[0].failures, 0);
        assert_eq!(summaries[0].worst_value_alpha, 3.0);
        assert_relative_eq!(summaries[1].max_rel_value_diff, 1e-6, max_relative = 1e-6);
        assert_eq!(summaries[1].failures, 1);
        assert!(!report.passes());
        assert_eq!(report.failures().len(), 1);
    }

    #[test]
    // Purpose
    // -------
    // An oracle failure alone fails the report; the CSV has one row per record.
    //
    // Given
    // -----
    // - One clean record and one oracle failure.
    //
    // Expect
    // ------
    // - `passes()` false, no failing records, CSV with header + 1 row.
    fn oracle_failures_fail_the_report() {
        // Arrange
        let report = ComparisonReport::new(
            vec![record(2.0, 1.0, 0.0, 0.0)],
            vec![OracleFailure { alpha: 1.05, q: 1.0, oracle: "mock", reason: "domain".into() }],
            ValidationTolerances::default(),
        );

        // Act
        let csv = report.to_csv();

        // Assert
        assert!(!report.passes());
        assert!(report.failures().is_empty());
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.starts_with("alpha,q,oracle"));
        assert!(report.to_string().ends_with("FAIL"));
    }
}
