//! Differential-validation harness for OSDI device models.
//!
//! This crate provides infrastructure for:
//! - Compiling an OSDI model description into a loadable shared object
//! - Resolving one netlist template into per-backend variants
//! - Running both variants through ngspice in isolated workspaces
//! - Comparing the result tables with per-analysis tolerances
//!
//! The simulator and the plugin toolchain are external processes; the
//! harness only verifies, from the outside, that the OSDI model and the
//! built-in model agree where they are expected to.

pub mod analysis;
pub mod builder;
pub mod compare;
pub mod config;
pub mod error;
pub mod exec;
pub mod harness;
pub mod netlist;
pub mod table;
pub mod workspace;

mod invoke;

pub use analysis::Analysis;
pub use compare::{CheckKind, CheckOutcome, ComparePolicies, ComparisonReport, ToleranceSpec};
pub use config::HarnessConfig;
pub use error::{Error, Result};
pub use exec::{CommandRunner, Invocation, RunStatus, ScriptedRunner, SystemRunner};
pub use harness::{Harness, ValidationOutcome};
pub use netlist::{Backend, ResolvedNetlists, resolve, resolve_pair};
pub use table::Table;
pub use workspace::Workspace;
