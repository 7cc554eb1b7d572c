//! Plugin builder: compiles the OSDI model description into a shared
//! object the simulator's plugin loader can pick up.
//!
//! The toolchain is opaque: compile to a position-independent object,
//! link it into a shared artifact, drop the intermediate. A nonzero
//! exit from either step is fatal; without the plugin the OSDI
//! comparison is meaningless, so nothing downstream may run.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::HarnessConfig;
use crate::error::{Error, Result};
use crate::exec::{CommandRunner, Invocation};

/// Compiler used for both the compile and link steps.
const CC: &str = "gcc";

/// Build the plugin from the configured model source and return the
/// path of the shared artifact, left in the build scratch directory
/// for the workspace manager to stage.
pub fn build_plugin(config: &HarnessConfig, runner: &dyn CommandRunner) -> Result<PathBuf> {
    let build_dir = config.build_dir();
    let source = config
        .model_source
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let artifact_name = config.plugin_name();
    let object = artifact_name.replace(".so", ".o");
    let include = config.osdi_include.to_string_lossy().into_owned();

    info!(source = %config.model_source.display(), "building OSDI plugin");

    let compile = Invocation::new(
        CC,
        &["-c", "-Wall", "-I", &include, "-fpic", &source, "-ggdb"],
        build_dir,
    );
    check_tool(runner.run(&compile)?, "compile")?;

    let link = Invocation::new(
        CC,
        &["-shared", "-o", &artifact_name, &object, "-ggdb"],
        build_dir,
    );
    check_tool(runner.run(&link)?, "link")?;

    // Intermediate object is build debris; the shared artifact is the
    // deliverable.
    let object_path = build_dir.join(&object);
    match std::fs::remove_file(&object_path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(Error::Stage {
                path: object_path,
                source,
            });
        }
    }

    let artifact = build_dir.join(&artifact_name);
    debug!(artifact = %artifact.display(), "plugin built");
    Ok(artifact)
}

fn check_tool(status: crate::exec::RunStatus, step: &str) -> Result<()> {
    if status.success() {
        Ok(())
    } else {
        if !status.stderr.is_empty() {
            debug!(step, stderr = %status.stderr, "build tool output");
        }
        Err(Error::BuildFailed {
            tool: format!("{CC} ({step})"),
            status: status.code_or_signal(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{RunStatus, ScriptedRunner};

    fn config(dir: &std::path::Path) -> HarnessConfig {
        HarnessConfig::new(
            dir.join("ws"),
            "ngspice",
            dir.join("diode_va.c"),
            "/usr/local/include/osdi",
        )
    }

    #[test]
    fn build_invokes_compile_then_link() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::always_ok();

        let artifact = build_plugin(&config(dir.path()), &runner).unwrap();
        assert_eq!(artifact, dir.path().join("diode_va.so"));

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].program, "gcc");
        assert!(calls[0].args.contains(&"-fpic".to_string()));
        assert!(calls[0].args.contains(&"diode_va.c".to_string()));
        assert_eq!(calls[1].args[0], "-shared");
        assert!(calls[1].args.contains(&"diode_va.o".to_string()));
        assert_eq!(calls[0].cwd, dir.path());
    }

    #[test]
    fn compile_failure_is_fatal_and_skips_the_link() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::new(|_| Ok(RunStatus::failed(1)));

        let err = build_plugin(&config(dir.path()), &runner).unwrap_err();
        assert!(matches!(err, Error::BuildFailed { status: 1, .. }));
        assert_eq!(runner.calls().len(), 1);
    }

    #[test]
    fn link_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::new(|inv| {
            if inv.args.first().map(String::as_str) == Some("-shared") {
                Ok(RunStatus::failed(2))
            } else {
                Ok(RunStatus::ok())
            }
        });

        let err = build_plugin(&config(dir.path()), &runner).unwrap_err();
        match err {
            Error::BuildFailed { tool, status } => {
                assert!(tool.contains("link"));
                assert_eq!(status, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(runner.calls().len(), 2);
    }

    #[test]
    fn intermediate_object_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let object = dir.path().join("diode_va.o");
        let object_for_handler = object.clone();
        let runner = ScriptedRunner::new(move |inv| {
            if inv.args.first().map(String::as_str) == Some("-c") {
                std::fs::write(&object_for_handler, b"obj").unwrap();
            }
            Ok(RunStatus::ok())
        });

        build_plugin(&config(dir.path()), &runner).unwrap();
        assert!(!object.exists());
    }
}
