//! Lead-field preset: the shell geometry, per-shell tissue assignment and
//! electromagnetic model that together decide which forward formula
//! `lsmac::build_lead_field` dispatches to.

use serde::{Deserialize, Serialize};

/// How a shell's outer radius is obtained when head geometry is fit but
/// skull thickness is not directly measured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RadiiModel {
    /// Radii are supplied directly (e.g. from a segmented volume).
    Given(Vec<f64>),
    /// Each shell keeps a constant ratio to the outer (scalp) radius; if
    /// the outer radius grows so do the inner shells.
    FixedRatio(Vec<f64>),
    /// Ratios are adjusted so that shell *thicknesses* stay constant in
    /// absolute terms as the outer radius varies, rather than the ratios
    /// themselves.
    ModulatedRatio { base_ratios: Vec<f64>, reference_outer_radius: f64 },
}

/// Which analytic family computes the per-dipole-component potential.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ElectromagneticModel {
    /// Closed-form single homogeneous sphere (`NumLayers == 1`).
    OneShellExactSphericalVector,
    /// 3-shell rescaling of the 1-shell solution by radial/tangential
    /// Ary factors (`NumLayers == 3`, always).
    ThreeShellApproxAry,
    /// Exact N-shell spherical solution via an accumulated Legendre
    /// series (any `NumLayers >= 1`).
    NShellExactSphericalLegendre,
}

/// One shell of the spherical head model, outermost listed first is not
/// required; shells are matched to radii by `tissue_index`, not order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShellSpec {
    pub tissue_index: usize,
    pub conductivity: f64,
}

/// Full configuration for one lead-field build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadFieldPreset {
    pub shells: Vec<ShellSpec>,
    pub radii: RadiiModel,
    pub model: ElectromagneticModel,
    /// Relative-change stopping threshold for the N-shell Legendre series.
    pub convergence: f64,
    pub max_legendre_terms: u32,
    pub min_legendre_terms: u32,
}

impl LeadFieldPreset {
    pub fn num_layers(&self) -> usize {
        self.shells.len()
    }

    /// Ordered outer radii, outermost (scalp) last stripped off by the
    /// caller as needed; resolves `self.radii` against the measured
    /// outer (scalp) radius.
    pub fn resolve_radii(&self, outer_radius: f64) -> Vec<f64> {
        match &self.radii {
            RadiiModel::Given(r) => r.clone(),
            RadiiModel::FixedRatio(ratios) => ratios.iter().map(|r| r * outer_radius).collect(),
            RadiiModel::ModulatedRatio { base_ratios, reference_outer_radius } => {
                if *reference_outer_radius <= 0.0 {
                    return base_ratios.iter().map(|r| r * outer_radius).collect();
                }
                let thickness_scale = outer_radius / reference_outer_radius;
                // Keep each shell's thickness below the scalp constant in
                // absolute terms: only the outermost boundary tracks the
                // measured radius, inner ones keep their reference gap.
                let n = base_ratios.len();
                base_ratios
                    .iter()
                    .enumerate()
                    .map(|(i, ratio)| {
                        if i + 1 == n {
                            outer_radius
                        } else {
                            outer_radius - (reference_outer_radius - ratio * reference_outer_radius) * thickness_scale
                        }
                    })
                    .collect()
            }
        }
    }
}

impl Default for LeadFieldPreset {
    /// The 3-shell (brain, skull, scalp) preset used throughout the
    /// testable scenarios: conductivities `(0.33, 0.016, 0.33)`.
    fn default() -> Self {
        Self {
            shells: vec![
                ShellSpec { tissue_index: 0, conductivity: 0.33 },
                ShellSpec { tissue_index: 1, conductivity: 0.016 },
                ShellSpec { tissue_index: 2, conductivity: 0.33 },
            ],
            radii: RadiiModel::FixedRatio(vec![0.84, 0.92, 1.0]),
            model: ElectromagneticModel::ThreeShellApproxAry,
            convergence: 1e-8,
            max_legendre_terms: 30,
            min_legendre_terms: 15,
        }
    }
}
