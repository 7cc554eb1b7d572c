//! Per-backend run workspaces.
//!
//! Each backend owns a dedicated directory under the workspace root;
//! nothing is shared between the two, so staging one backend cannot
//! contaminate the other. Results are left in place after a run for
//! inspection and purged by the next run's reset.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::analysis::Analysis;
use crate::error::{Error, Result};
use crate::netlist::Backend;

/// Filename of the staged netlist inside every workspace.
pub const NETLIST_FILE: &str = "netlist.sp";

/// Subdirectory the simulator's plugin loader scans for OSDI objects.
pub const MODEL_DIR: &str = "osdi";

/// One backend's isolated staging directory.
#[derive(Debug, Clone)]
pub struct Workspace {
    backend: Backend,
    root: PathBuf,
}

impl Workspace {
    /// Workspace for `backend` under the given root.
    pub fn new(workspace_root: &Path, backend: Backend) -> Self {
        Self {
            backend,
            root: workspace_root.join(backend.dir_name()),
        }
    }

    /// The backend this workspace belongs to.
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Workspace root directory; the simulator runs with this as its
    /// working directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the staged netlist.
    pub fn netlist_path(&self) -> PathBuf {
        self.root.join(NETLIST_FILE)
    }

    /// OSDI model directory inside this workspace.
    pub fn model_dir(&self) -> PathBuf {
        self.root.join(MODEL_DIR)
    }

    /// Path the simulator writes the given analysis's result table to.
    pub fn result_table(&self, analysis: Analysis) -> PathBuf {
        self.root.join(analysis.table_file())
    }

    /// Delete any prior contents and recreate the workspace empty.
    /// Idempotent: a missing directory on first run is not an error.
    pub fn reset(&self) -> Result<()> {
        match std::fs::remove_dir_all(&self.root) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(Error::Stage {
                    path: self.root.clone(),
                    source,
                });
            }
        }
        std::fs::create_dir_all(&self.root).map_err(|source| Error::Stage {
            path: self.root.clone(),
            source,
        })?;
        debug!(backend = %self.backend, root = %self.root.display(), "workspace reset");
        Ok(())
    }

    /// Write the resolved netlist and, for the OSDI backend, place the
    /// plugin artifact into the model directory.
    pub fn stage(&self, netlist: &str, plugin_artifact: Option<&Path>) -> Result<()> {
        let netlist_path = self.netlist_path();
        std::fs::write(&netlist_path, netlist).map_err(|source| Error::Stage {
            path: netlist_path,
            source,
        })?;

        if let Some(artifact) = plugin_artifact {
            let model_dir = self.model_dir();
            std::fs::create_dir_all(&model_dir).map_err(|source| Error::Stage {
                path: model_dir.clone(),
                source,
            })?;
            let file_name = artifact.file_name().ok_or_else(|| Error::Stage {
                path: artifact.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "plugin artifact path has no file name",
                ),
            })?;
            let dest = model_dir.join(file_name);
            std::fs::copy(artifact, &dest).map_err(|source| Error::Stage {
                path: dest.clone(),
                source,
            })?;
            debug!(artifact = %dest.display(), "plugin staged");
        }

        Ok(())
    }
}
