//! Comparison report generation.

use serde::{Deserialize, Serialize};

/// The first offending row of a failed check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PointFailure {
    /// Row index in both tables.
    pub index: usize,
    /// Value from the OSDI backend.
    pub osdi: f64,
    /// Value from the built-in backend.
    pub built_in: f64,
    /// Relative error at this row.
    pub rel_error: f64,
}

/// Result of one check within an analysis comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Column name, or a description like "presence".
    pub name: String,
    /// Whether the check passed.
    pub passed: bool,
    /// Number of rows inspected.
    pub rows_checked: usize,
    /// Largest relative error seen over the checked window.
    pub max_rel_error: f64,
    /// First violating row, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<PointFailure>,
}

/// Complete comparison report for one analysis type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Analysis label ("DC", "AC", "Transient").
    pub analysis: String,
    /// Whether every check passed.
    pub passed: bool,
    /// Individual check outcomes.
    pub checks: Vec<CheckOutcome>,
}

impl ComparisonReport {
    /// Create an empty, passing report.
    pub fn new(analysis: &str) -> Self {
        Self {
            analysis: analysis.to_string(),
            passed: true,
            checks: Vec::new(),
        }
    }

    /// Record a check outcome.
    pub fn add_check(&mut self, check: CheckOutcome) {
        if !check.passed {
            self.passed = false;
        }
        self.checks.push(check);
    }

    /// First failed check, if any.
    pub fn first_failure(&self) -> Option<&CheckOutcome> {
        self.checks.iter().find(|c| !c.passed)
    }

    /// Format as human-readable text.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{} comparison: {}\n",
            self.analysis,
            if self.passed { "PASS" } else { "FAIL" }
        ));
        for check in &self.checks {
            let status = if check.passed { "PASS" } else { "FAIL" };
            out.push_str(&format!(
                "  {}: {} ({} rows, max relative error {:.3e})\n",
                check.name, status, check.rows_checked, check.max_rel_error
            ));
            if let Some(f) = &check.failure {
                out.push_str(&format!(
                    "    first violation at row {}: osdi={:.9e} built-in={:.9e} (rel {:.3e})\n",
                    f.index, f.osdi, f.built_in, f.rel_error
                ));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_check_fails_the_report() {
        let mut report = ComparisonReport::new("DC");
        report.add_check(CheckOutcome {
            name: "i(vsense)".to_string(),
            passed: true,
            rows_checked: 20,
            max_rel_error: 1e-4,
            failure: None,
        });
        assert!(report.passed);

        report.add_check(CheckOutcome {
            name: "v(d)".to_string(),
            passed: false,
            rows_checked: 20,
            max_rel_error: 0.05,
            failure: Some(PointFailure {
                index: 5,
                osdi: 1.05,
                built_in: 1.0,
                rel_error: 0.05,
            }),
        });
        assert!(!report.passed);
        assert_eq!(report.first_failure().unwrap().name, "v(d)");
        assert!(report.to_text().contains("first violation at row 5"));
    }
}
