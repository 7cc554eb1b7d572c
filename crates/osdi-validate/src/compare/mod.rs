//! Equivalence comparison between OSDI and built-in result tables.
//!
//! Tables are compared by row index; both backends are driven by the
//! identical sweep directive through the shared netlist template, so
//! row alignment is a structural precondition, not something inferred
//! here.

pub mod report;
pub mod tolerances;

pub use report::{CheckOutcome, ComparisonReport, PointFailure};
pub use tolerances::{CheckKind, ComparePolicies, ToleranceSpec, relative_error, values_match};

use crate::analysis::Analysis;
use crate::error::{Error, Result};
use crate::table::Table;

/// Compare the OSDI table against the built-in table under the given
/// policy. Errors only on a missing column or an empty presence check;
/// tolerance violations are recorded in the report.
pub fn compare_tables(
    analysis: Analysis,
    osdi: &Table,
    built_in: &Table,
    policy: &CheckKind,
) -> Result<ComparisonReport> {
    let mut report = ComparisonReport::new(analysis.label());

    match policy {
        CheckKind::Strict { column, spec } | CheckKind::SweepGrid { column, spec } => {
            let a = osdi.column(column)?;
            let b = built_in.column(column)?;
            report.add_check(check_columns(column, a, b, spec));
        }
        CheckKind::Presence => {
            let rows = osdi.num_rows().min(built_in.num_rows());
            report.add_check(CheckOutcome {
                name: "presence".to_string(),
                passed: osdi.num_rows() > 0 && built_in.num_rows() > 0,
                rows_checked: rows,
                max_rel_error: 0.0,
                failure: None,
            });
        }
    }

    Ok(report)
}

/// Convert a failed report into the error the harness aborts with.
pub fn enforce(report: &ComparisonReport, policy: &CheckKind) -> Result<()> {
    if report.passed {
        return Ok(());
    }
    let check = report.first_failure().expect("failed report has a failure");
    let rtol = match policy {
        CheckKind::Strict { spec, .. } | CheckKind::SweepGrid { spec, .. } => spec.rtol,
        CheckKind::Presence => 0.0,
    };
    match &check.failure {
        Some(f) => Err(Error::ToleranceViolation {
            analysis: report.analysis.clone(),
            column: check.name.clone(),
            index: f.index,
            osdi: f.osdi,
            built_in: f.built_in,
            rel_error: f.rel_error,
            rtol,
        }),
        // Presence or row-count failure: no single offending point.
        None => Err(Error::ToleranceViolation {
            analysis: report.analysis.clone(),
            column: check.name.clone(),
            index: check.rows_checked,
            osdi: f64::NAN,
            built_in: f64::NAN,
            rel_error: f64::INFINITY,
            rtol,
        }),
    }
}

/// Elementwise comparison of two columns over the spec's row window.
fn check_columns(name: &str, osdi: &[f64], built_in: &[f64], spec: &ToleranceSpec) -> CheckOutcome {
    let window = spec.window(osdi.len().min(built_in.len()));

    let mut max_rel_error = 0.0_f64;
    let mut failure = None;
    // A full-column check requires equal row counts. A windowed check
    // requires both tables to cover the window: a simulator that dies
    // mid-sweep leaves a short table, and checking only the rows that
    // exist would pass it silently. A sweep that is legitimately
    // shorter than the window produces the same row count on both
    // sides.
    let mut passed = match spec.rows {
        Some(n) => {
            osdi.len() == built_in.len() || (osdi.len() >= n && built_in.len() >= n)
        }
        None => osdi.len() == built_in.len(),
    };

    for i in 0..window {
        let (a, b) = (osdi[i], built_in[i]);
        let rel = relative_error(a, b);
        max_rel_error = max_rel_error.max(rel);
        if !values_match(a, b, spec) && failure.is_none() {
            passed = false;
            failure = Some(PointFailure {
                index: i,
                osdi: a,
                built_in: b,
                rel_error: rel,
            });
        }
    }

    CheckOutcome {
        name: name.to_string(),
        passed,
        rows_checked: window,
        max_rel_error,
        failure,
    }
}
