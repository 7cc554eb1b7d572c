//! Error types for the validation harness.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for harness operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during a validation run.
#[derive(Debug, Error)]
pub enum Error {
    /// An external build tool (compiler or linker) exited nonzero.
    /// Fatal before any simulation: without the plugin the OSDI
    /// comparison is meaningless.
    #[error("plugin build failed: {tool} exited with status {status}")]
    BuildFailed { tool: String, status: i32 },

    /// An external program could not be launched at all.
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// An external program exceeded its wall-clock budget. Distinct
    /// from a nonzero exit so callers can tell a hang from a failure.
    #[error("{program} timed out after {seconds}s")]
    Timeout { program: String, seconds: u64 },

    /// A filesystem operation failed while resetting or staging a
    /// workspace.
    #[error("workspace operation failed at {path}: {source}")]
    Stage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A result table could not be read. This is how a failed or
    /// crashed simulation usually surfaces.
    #[error("failed to read result table {path}: {source}")]
    TableRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A result table was present but malformed.
    #[error("malformed result table{}: line {line}: {reason}", fmt_path(.path))]
    TableParse {
        path: Option<PathBuf>,
        line: usize,
        reason: String,
    },

    /// A comparison asked for a column the table does not have.
    #[error("column {name:?} not found (available: {available})")]
    ColumnNotFound { name: String, available: String },

    /// A tolerance check failed. Carries enough context to diagnose
    /// without rerunning.
    #[error(
        "{analysis} comparison failed: column {column:?} row {index}: \
         osdi={osdi:.9e} built-in={built_in:.9e} (relative error {rel_error:.3e}, rtol {rtol:.1e})"
    )]
    ToleranceViolation {
        analysis: String,
        column: String,
        index: usize,
        osdi: f64,
        built_in: f64,
        rel_error: f64,
        rtol: f64,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error (report output).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn fmt_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" {}", p.display()),
        None => String::new(),
    }
}
