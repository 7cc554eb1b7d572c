//! Netlist template resolution.
//!
//! One canonical template carries both backends' simulation directives,
//! each prefixed by a marker that doubles as a SPICE comment leader.
//! Resolving for a backend strips that backend's marker text, turning
//! its directives live; the other backend's lines stay commented out.

use serde::{Deserialize, Serialize};

/// Marker prefixing OSDI-backend directives in the template.
pub const OSDI_MARKER: &str = "*OSDI_ACTIVATE*";

/// Marker prefixing built-in-backend directives in the template.
pub const BUILT_IN_MARKER: &str = "*BUILT_IN_ACTIVATE*";

/// Which device-model evaluator a resolved netlist exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Backend {
    /// Dynamically loaded OSDI plugin model.
    Osdi,
    /// The simulator's native, statically compiled model.
    BuiltIn,
}

impl Backend {
    /// Both backends, OSDI first.
    pub const ALL: [Backend; 2] = [Backend::Osdi, Backend::BuiltIn];

    /// The marker whose removal activates this backend.
    pub fn marker(&self) -> &'static str {
        match self {
            Backend::Osdi => OSDI_MARKER,
            Backend::BuiltIn => BUILT_IN_MARKER,
        }
    }

    /// Workspace directory name for this backend.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Backend::Osdi => "test_osdi",
            Backend::BuiltIn => "test_built_in",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Backend::Osdi => "osdi",
            Backend::BuiltIn => "built-in",
        })
    }
}

/// The two concrete netlists produced from one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNetlists {
    /// Variant with the OSDI directives live.
    pub osdi: String,
    /// Variant with the built-in directives live.
    pub built_in: String,
}

impl ResolvedNetlists {
    /// The variant for the given backend.
    pub fn for_backend(&self, backend: Backend) -> &str {
        match backend {
            Backend::Osdi => &self.osdi,
            Backend::BuiltIn => &self.built_in,
        }
    }
}

/// Resolve the template for one backend by stripping its marker.
///
/// A template without the marker resolves to an unchanged copy; the
/// activation scheme degrades gracefully to "always active".
pub fn resolve(template: &str, backend: Backend) -> String {
    template.replace(backend.marker(), "")
}

/// Resolve both variants from one template.
pub fn resolve_pair(template: &str) -> ResolvedNetlists {
    ResolvedNetlists {
        osdi: resolve(template, Backend::Osdi),
        built_in: resolve(template, Backend::BuiltIn),
    }
}
