//! External-process invocation seam.
//!
//! Every external tool the harness touches (compiler, linker,
//! simulator) goes through [`CommandRunner`], so the full pipeline can
//! be exercised in tests without spawning real processes.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Mutex;
use std::time::Duration;

use crate::error::{Error, Result};

/// One external tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program name or path.
    pub program: String,
    /// Arguments, in order.
    pub args: Vec<String>,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Invocation {
    /// Build an invocation from string-ish parts.
    pub fn new<S: Into<String>>(program: S, args: &[&str], cwd: &Path) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            cwd: cwd.to_path_buf(),
        }
    }
}

/// Exit information from a completed invocation.
#[derive(Debug, Clone)]
pub struct RunStatus {
    /// Exit code; `None` if the process was killed by a signal.
    pub code: Option<i32>,
    /// Captured stderr, for diagnostics only.
    pub stderr: String,
}

impl RunStatus {
    /// A successful exit with empty stderr.
    pub fn ok() -> Self {
        Self {
            code: Some(0),
            stderr: String::new(),
        }
    }

    /// A failed exit with the given code.
    pub fn failed(code: i32) -> Self {
        Self {
            code: Some(code),
            stderr: String::new(),
        }
    }

    /// Whether the process exited with status zero.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Exit code, with signal termination reported as -1.
    pub fn code_or_signal(&self) -> i32 {
        self.code.unwrap_or(-1)
    }
}

/// Narrow interface for running an external tool to completion.
pub trait CommandRunner {
    /// Run the invocation synchronously and return its exit status.
    ///
    /// Errors are reserved for "could not run" conditions (spawn
    /// failure, timeout); a nonzero exit is reported through
    /// [`RunStatus`], and the policy for it belongs to the caller.
    fn run(&self, invocation: &Invocation) -> Result<RunStatus>;
}

/// Runner backed by real subprocesses, with a wall-clock timeout per
/// invocation.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    timeout: Duration,
}

impl SystemRunner {
    /// Create a runner with the given per-invocation timeout.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<RunStatus> {
        // stdout is discarded: results arrive as files in the working
        // directory, and an undrained pipe would let a chatty tool
        // fill the buffer and stall until the timeout kills it.
        // stderr is small and only read after exit.
        let child = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| Error::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        wait_with_timeout(child, self.timeout, &invocation.program)
    }
}

/// Poll a child process until it exits or the timeout expires.
fn wait_with_timeout(
    mut child: std::process::Child,
    timeout: Duration,
    program: &str,
) -> Result<RunStatus> {
    let start = std::time::Instant::now();
    let poll_interval = Duration::from_millis(100);

    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                let stderr = child
                    .stderr
                    .take()
                    .map(|mut s| {
                        let mut buf = Vec::new();
                        std::io::Read::read_to_end(&mut s, &mut buf).ok();
                        String::from_utf8_lossy(&buf).into_owned()
                    })
                    .unwrap_or_default();

                return Ok(RunStatus {
                    code: status.code(),
                    stderr,
                });
            }
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    return Err(Error::Timeout {
                        program: program.to_string(),
                        seconds: timeout.as_secs(),
                    });
                }
                std::thread::sleep(poll_interval);
            }
            Err(source) => {
                return Err(Error::Spawn {
                    program: program.to_string(),
                    source,
                });
            }
        }
    }
}

type ScriptHandler = Box<dyn Fn(&Invocation) -> Result<RunStatus> + Send + Sync>;

/// Scripted runner for tests: a handler decides each invocation's
/// outcome (and may create files as a side effect, standing in for the
/// simulator or the compiler), while every call is logged for later
/// inspection.
pub struct ScriptedRunner {
    handler: ScriptHandler,
    calls: Mutex<Vec<Invocation>>,
}

impl ScriptedRunner {
    /// Create a runner driven by the given handler.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&Invocation) -> Result<RunStatus> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A runner whose every invocation succeeds with no side effects.
    pub fn always_ok() -> Self {
        Self::new(|_| Ok(RunStatus::ok()))
    }

    /// Invocations seen so far, in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, invocation: &Invocation) -> Result<RunStatus> {
        self.calls.lock().unwrap().push(invocation.clone());
        (self.handler)(invocation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_runner_logs_calls_in_order() {
        let runner = ScriptedRunner::always_ok();
        let cwd = PathBuf::from("/tmp");
        runner
            .run(&Invocation::new("gcc", &["-c", "model.c"], &cwd))
            .unwrap();
        runner
            .run(&Invocation::new("ngspice", &["netlist.sp", "-b"], &cwd))
            .unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].program, "gcc");
        assert_eq!(calls[1].program, "ngspice");
        assert_eq!(calls[1].args, vec!["netlist.sp", "-b"]);
    }

    #[test]
    fn run_status_success() {
        assert!(RunStatus::ok().success());
        assert!(!RunStatus::failed(2).success());
        assert_eq!(RunStatus::failed(2).code_or_signal(), 2);
        let signalled = RunStatus {
            code: None,
            stderr: String::new(),
        };
        assert!(!signalled.success());
        assert_eq!(signalled.code_or_signal(), -1);
    }

    #[test]
    fn system_runner_reports_spawn_failure() {
        let runner = SystemRunner::new(Duration::from_secs(1));
        let err = runner
            .run(&Invocation::new(
                "definitely-not-a-real-binary-9a1c",
                &[],
                Path::new("."),
            ))
            .unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }

    #[test]
    fn system_runner_captures_exit_code() {
        // `false` is universally available and exits nonzero.
        let runner = SystemRunner::default();
        let status = runner
            .run(&Invocation::new("false", &[], Path::new(".")))
            .unwrap();
        assert!(!status.success());
    }

    #[test]
    fn system_runner_is_not_stalled_by_chatty_stdout() {
        // 200 KiB of stdout is well past the pipe buffer; the run
        // must finish promptly rather than block until the timeout.
        let runner = SystemRunner::new(Duration::from_secs(10));
        let status = runner
            .run(&Invocation::new(
                "sh",
                &["-c", "head -c 200000 /dev/zero"],
                Path::new("."),
            ))
            .unwrap();
        assert!(status.success());
    }
}
