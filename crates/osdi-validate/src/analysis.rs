//! Analysis types covered by a validation run.

use serde::{Deserialize, Serialize};

/// One of the three analyses the shared netlist template drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Analysis {
    /// DC bias sweep.
    Dc,
    /// Small-signal AC frequency sweep.
    Ac,
    /// Time-domain transient simulation.
    Transient,
}

impl Analysis {
    /// All analyses, in the order they are compared.
    pub const ALL: [Analysis; 3] = [Analysis::Dc, Analysis::Ac, Analysis::Transient];

    /// File the simulator writes its result table to, relative to the
    /// workspace root.
    pub fn table_file(&self) -> &'static str {
        match self {
            Analysis::Dc => "dc_sim.ngspice",
            Analysis::Ac => "ac_sim.ngspice",
            Analysis::Transient => "tr_sim.ngspice",
        }
    }

    /// Short label used in reports and errors.
    pub fn label(&self) -> &'static str {
        match self {
            Analysis::Dc => "DC",
            Analysis::Ac => "AC",
            Analysis::Transient => "Transient",
        }
    }
}

impl std::fmt::Display for Analysis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
