//! How much of the optional resolution-matrix output a run produces
//! alongside the inverse operators proper.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionMode {
    /// Only the inverse operators are built and written.
    Minimal,
    /// Inverse operators plus the full/per-source/transposed resolution
    /// matrices for every method, each written alongside the operator
    /// file.
    WithResolution,
}

impl Default for ExecutionMode {
    fn default() -> Self {
        ExecutionMode::Minimal
    }
}
