//! Simulator invocation.
//!
//! Runs ngspice once per workspace in non-interactive batch mode. The
//! simulator writes its result tables into the working directory as a
//! side effect; nothing is read from stdout.
//!
//! Policy: a nonzero exit is logged but not fatal here. A malformed
//! netlist surfaces most clearly as a missing or truncated result
//! table, which the loader reports with the offending path. A timeout,
//! by contrast, is fatal: it means the run never completed.

use tracing::{info, warn};

use crate::config::HarnessConfig;
use crate::error::Result;
use crate::exec::{CommandRunner, Invocation};
use crate::workspace::{NETLIST_FILE, Workspace};

/// Batch-mode flag; without it ngspice drops into its interactive
/// shell and never exits.
const BATCH_FLAG: &str = "-b";

/// Run the simulator against the workspace's staged netlist.
pub fn run_simulation(
    workspace: &Workspace,
    config: &HarnessConfig,
    runner: &dyn CommandRunner,
) -> Result<()> {
    let invocation = Invocation::new(
        config.simulator.to_string_lossy(),
        &[NETLIST_FILE, BATCH_FLAG],
        workspace.root(),
    );

    info!(backend = %workspace.backend(), "running simulation");
    let status = runner.run(&invocation)?;

    if !status.success() {
        // Not fatal: the result loader will fail with a clearer
        // diagnostic if expected tables are missing.
        warn!(
            backend = %workspace.backend(),
            code = status.code_or_signal(),
            "simulator exited nonzero"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::exec::{RunStatus, ScriptedRunner};
    use crate::netlist::Backend;

    fn config(dir: &std::path::Path) -> HarnessConfig {
        HarnessConfig::new(dir, "ngspice", dir.join("diode_va.c"), "/inc")
    }

    #[test]
    fn invokes_batch_mode_in_workspace_root() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::new(dir.path(), Backend::Osdi);
        let runner = ScriptedRunner::always_ok();

        run_simulation(&ws, &config(dir.path()), &runner).unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "ngspice");
        assert_eq!(calls[0].args, vec!["netlist.sp", "-b"]);
        assert_eq!(calls[0].cwd, ws.root());
    }

    #[test]
    fn nonzero_exit_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::new(dir.path(), Backend::BuiltIn);
        let runner = ScriptedRunner::new(|_| Ok(RunStatus::failed(1)));

        run_simulation(&ws, &config(dir.path()), &runner).unwrap();
    }

    #[test]
    fn timeout_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::new(dir.path(), Backend::Osdi);
        let runner = ScriptedRunner::new(|inv| {
            Err(Error::Timeout {
                program: inv.program.clone(),
                seconds: 60,
            })
        });

        let err = run_simulation(&ws, &config(dir.path()), &runner).unwrap_err();
        assert!(matches!(err, Error::Timeout { .. }));
    }
}
