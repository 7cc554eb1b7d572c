//! End-to-end validation pipeline.
//!
//! One run is a single linear batch job: build the plugin, resolve the
//! template, reset and stage both workspaces, invoke the simulator
//! twice, load the six result tables, compare per analysis. No
//! retries, no concurrency; the first violated invariant aborts the
//! run.

use std::path::Path;

use tracing::info;

use crate::analysis::Analysis;
use crate::builder::build_plugin;
use crate::compare::{ComparisonReport, compare_tables, enforce};
use crate::config::HarnessConfig;
use crate::error::Result;
use crate::exec::CommandRunner;
use crate::invoke::run_simulation;
use crate::netlist::{Backend, resolve_pair};
use crate::table::Table;
use crate::workspace::Workspace;

/// Everything a completed run leaves behind in memory. The result
/// tables themselves stay on disk in the workspaces for inspection.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    /// One report per analysis type, in comparison order.
    pub reports: Vec<ComparisonReport>,
}

impl ValidationOutcome {
    /// Whether every comparison passed. A returned outcome always
    /// has, since violations abort the run; kept for report consumers.
    pub fn passed(&self) -> bool {
        self.reports.iter().all(|r| r.passed)
    }
}

/// The differential-validation harness.
pub struct Harness<'r> {
    config: HarnessConfig,
    runner: &'r dyn CommandRunner,
}

impl<'r> Harness<'r> {
    /// Create a harness over the given configuration and process
    /// runner.
    pub fn new(config: HarnessConfig, runner: &'r dyn CommandRunner) -> Self {
        Self { config, runner }
    }

    /// The active configuration.
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Run the full pipeline against a netlist template.
    pub fn run(&self, template: &str) -> Result<ValidationOutcome> {
        // Build first: if the plugin cannot be produced, no simulation
        // is meaningful and no workspace gets staged.
        let artifact = build_plugin(&self.config, self.runner)?;

        let netlists = resolve_pair(template);

        let osdi_ws = Workspace::new(&self.config.workspace_root, Backend::Osdi);
        let built_in_ws = Workspace::new(&self.config.workspace_root, Backend::BuiltIn);

        osdi_ws.reset()?;
        built_in_ws.reset()?;
        osdi_ws.stage(&netlists.osdi, Some(&artifact))?;
        built_in_ws.stage(&netlists.built_in, None)?;

        run_simulation(&osdi_ws, &self.config, self.runner)?;
        run_simulation(&built_in_ws, &self.config, self.runner)?;

        let mut reports = Vec::with_capacity(Analysis::ALL.len());
        for analysis in Analysis::ALL {
            let osdi_table = Table::load(&osdi_ws.result_table(analysis))?;
            let built_in_table = Table::load(&built_in_ws.result_table(analysis))?;

            let policy = self.config.policies.for_analysis(analysis);
            let report = compare_tables(analysis, &osdi_table, &built_in_table, policy)?;
            info!(analysis = %analysis, passed = report.passed, "comparison done");
            enforce(&report, policy)?;
            reports.push(report);
        }

        Ok(ValidationOutcome { reports })
    }

    /// Read the template from a file and run the pipeline.
    pub fn run_template_file(&self, path: &Path) -> Result<ValidationOutcome> {
        let template = std::fs::read_to_string(path)?;
        self.run(&template)
    }
}
