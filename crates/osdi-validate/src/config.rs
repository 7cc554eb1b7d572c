//! Harness configuration.
//!
//! Everything a run depends on is passed in explicitly (executable
//! paths, workspace root, tolerances) so components can be unit-tested
//! against temporary directories and two runs never share state.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::compare::ComparePolicies;

/// Configuration for one validation run.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Path to the ngspice executable.
    pub simulator: PathBuf,
    /// OSDI model description source file (C, translated from
    /// Verilog-A) consumed by the plugin builder.
    pub model_source: PathBuf,
    /// Include path for the simulator's OSDI interface headers.
    pub osdi_include: PathBuf,
    /// Directory under which the two backend workspaces live.
    pub workspace_root: PathBuf,
    /// Wall-clock budget per external tool invocation.
    pub timeout: Duration,
    /// Per-analysis comparison policies.
    pub policies: ComparePolicies,
}

impl HarnessConfig {
    /// Create a configuration with default timeout and policies.
    pub fn new(
        workspace_root: impl Into<PathBuf>,
        simulator: impl Into<PathBuf>,
        model_source: impl Into<PathBuf>,
        osdi_include: impl Into<PathBuf>,
    ) -> Self {
        Self {
            simulator: simulator.into(),
            model_source: model_source.into(),
            osdi_include: osdi_include.into(),
            workspace_root: workspace_root.into(),
            timeout: Duration::from_secs(60),
            policies: ComparePolicies::default(),
        }
    }

    /// Override the per-invocation timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the comparison policies.
    pub fn with_policies(mut self, policies: ComparePolicies) -> Self {
        self.policies = policies;
        self
    }

    /// Basename of the plugin artifact, derived from the model source
    /// (`diode_va.c` builds `diode_va.so`).
    pub fn plugin_name(&self) -> String {
        let stem = self
            .model_source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string());
        format!("{stem}.so")
    }

    /// Directory the model source lives in, used as the build scratch
    /// directory.
    pub fn build_dir(&self) -> &Path {
        self.model_source.parent().unwrap_or_else(|| Path::new("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_name_follows_source_stem() {
        let config = HarnessConfig::new("/ws", "ngspice", "/models/diode_va.c", "/inc");
        assert_eq!(config.plugin_name(), "diode_va.so");
        assert_eq!(config.build_dir(), Path::new("/models"));
    }
}
