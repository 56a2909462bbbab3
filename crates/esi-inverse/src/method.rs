//! Which inverse method to build, and how many regularization levels to
//! keep.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InverseMethod {
    Mn,
    Wmn,
    Loreta,
    SLoreta,
    ELoreta,
    Dale,
    Laura,
}

impl InverseMethod {
    pub fn name(&self) -> &'static str {
        match self {
            InverseMethod::Mn => "MN",
            InverseMethod::Wmn => "WMN",
            InverseMethod::Loreta => "LORETA",
            InverseMethod::SLoreta => "sLORETA",
            InverseMethod::ELoreta => "eLORETA",
            InverseMethod::Dale => "Dale",
            InverseMethod::Laura => "LAURA",
        }
    }

    /// The `down` divisor in `regv[r] = r * lambda_max / down`.
    pub fn regularization_down(&self) -> f64 {
        match self {
            InverseMethod::Mn => 500.0,
            InverseMethod::Wmn => 1000.0,
            InverseMethod::Loreta => 8000.0,
            InverseMethod::SLoreta => 4000.0,
            InverseMethod::ELoreta => 1000.0,
            InverseMethod::Dale => 500.0,
            InverseMethod::Laura => 2000.0,
        }
    }
}

/// Which methods to build and how deep a regularization schedule each
/// keeps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InverseMethodConfig {
    pub method: InverseMethod,
    /// How many points of the regularization schedule to keep; typically 12-24.
    pub num_saved_regularizations: usize,
}

impl Default for InverseMethodConfig {
    fn default() -> Self {
        Self { method: InverseMethod::Mn, num_saved_regularizations: 14 }
    }
}

pub const ELORETA_MAX_ITERATIONS: usize = 15;
pub const ELORETA_CONVERGENCE: f64 = 5e-3;
pub const LAURA_POWER: f64 = 0.5;
