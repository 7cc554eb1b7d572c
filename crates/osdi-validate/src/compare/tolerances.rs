//! Tolerance specifications and per-analysis comparison policies.

use serde::{Deserialize, Serialize};

use crate::analysis::Analysis;

/// Relative-tolerance spec with a near-zero absolute fallback and an
/// optional row window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToleranceSpec {
    /// Relative tolerance (fraction).
    pub rtol: f64,
    /// Absolute tolerance; pairs within it pass regardless of the
    /// relative check, which keeps near-zero values from blowing up
    /// the relative error.
    pub atol: f64,
    /// Number of leading rows to check; `None` checks every row. The
    /// two model implementations are only required to agree inside a
    /// validated operating region.
    pub rows: Option<usize>,
}

impl ToleranceSpec {
    /// DC device-current check: 1% relative over the first 20 sweep
    /// points (the validated bias range).
    pub const DC_CURRENT: ToleranceSpec = ToleranceSpec {
        rtol: 1e-2,
        atol: 1e-12,
        rows: Some(20),
    };

    /// Sweep-grid agreement: both backends are driven by the same
    /// sweep directive, so the independent variable must match to
    /// floating-point printing precision.
    pub const SWEEP_GRID: ToleranceSpec = ToleranceSpec {
        rtol: 1e-9,
        atol: 1e-15,
        rows: None,
    };

    /// Number of rows to check for a column of `len` rows.
    pub fn window(&self, len: usize) -> usize {
        match self.rows {
            Some(n) => n.min(len),
            None => len,
        }
    }
}

/// Check whether two values agree within the spec.
///
/// Symmetric in its value arguments: the relative error is taken
/// against the larger magnitude, so swapping the two tables cannot
/// flip a pass into a fail.
pub fn values_match(a: f64, b: f64, spec: &ToleranceSpec) -> bool {
    let abs_diff = (a - b).abs();
    if abs_diff <= spec.atol {
        return true;
    }
    let scale = a.abs().max(b.abs());
    abs_diff <= spec.rtol * scale
}

/// Relative error between two values, against the larger magnitude.
pub fn relative_error(a: f64, b: f64) -> f64 {
    let scale = a.abs().max(b.abs());
    if scale < 1e-300 {
        0.0
    } else {
        (a - b).abs() / scale
    }
}

/// What the comparator checks for one analysis type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckKind {
    /// Elementwise relative comparison of a named dependent column.
    Strict {
        /// Dependent-signal column, e.g. `i(vsense)`.
        column: String,
        /// Tolerances and row window.
        spec: ToleranceSpec,
    },
    /// Both backends must have produced the identical sweep grid in
    /// the named independent column; dependent columns are unchecked
    /// because the two model implementations legitimately diverge.
    SweepGrid {
        /// Independent-variable column, e.g. `frequency`.
        column: String,
        /// Tolerances for the grid itself.
        spec: ToleranceSpec,
    },
    /// The table must exist and contain at least one row. Used where
    /// even the grid differs between backends (adaptive transient
    /// timesteps).
    Presence,
}

/// Per-analysis comparison policies for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparePolicies {
    /// DC sweep policy.
    pub dc: CheckKind,
    /// AC sweep policy.
    pub ac: CheckKind,
    /// Transient policy.
    pub transient: CheckKind,
}

impl Default for ComparePolicies {
    /// The diode validation defaults: strict 1% on the sense current
    /// over the validated DC bias range; AC checked for an identical
    /// frequency grid; transient checked for presence only (the
    /// adaptive timestep grids differ between model implementations).
    fn default() -> Self {
        Self {
            dc: CheckKind::Strict {
                column: "i(vsense)".to_string(),
                spec: ToleranceSpec::DC_CURRENT,
            },
            ac: CheckKind::SweepGrid {
                column: "frequency".to_string(),
                spec: ToleranceSpec::SWEEP_GRID,
            },
            transient: CheckKind::Presence,
        }
    }
}

impl ComparePolicies {
    /// Policy for the given analysis.
    pub fn for_analysis(&self, analysis: Analysis) -> &CheckKind {
        match analysis {
            Analysis::Dc => &self.dc,
            Analysis::Ac => &self.ac,
            Analysis::Transient => &self.transient,
        }
    }
}
