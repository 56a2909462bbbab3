//! LSMAC (Locally Spherical Model with Anatomical Constraints) lead-field
//! assembly: dispatches each electrode/solution-point pair to the
//! configured analytic family, locally deforming the shell radii per
//! electrode by probing the fitted head-surface model along its
//! direction, then assembles the full `K` matrix and the rejected-point
//! set.

use ndarray::Array2;
use rayon::prelude::*;

use esi_common::{EsiError, Result};
use esi_geometry::{FitModelOnPoints, Pset};
use esi_optimizer::ParamKind;
use esi_solution_points::RejectedSet;

use crate::dipole::Dipole;
use crate::potential;
use crate::preset::{ElectromagneticModel, LeadFieldPreset};

/// One computed potential column (per electrode) for a single dipole
/// orientation at a single solution point.
fn potential_row(
    preset: &LeadFieldPreset,
    dipole: &Dipole,
    electrodes: &[[f64; 3]],
    shell_radii: &[f64],
) -> Vec<f64> {
    let outer_radius = *shell_radii.last().unwrap_or(&1.0);
    electrodes
        .iter()
        .map(|&electrode_pos| match preset.model {
            ElectromagneticModel::OneShellExactSphericalVector => {
                let sigma = preset.shells.last().map(|s| s.conductivity).unwrap_or(0.33);
                potential::potential_one_shell_exact_spherical_vector(
                    dipole,
                    electrode_pos,
                    outer_radius,
                    sigma,
                )
            }
            ElectromagneticModel::ThreeShellApproxAry => {
                debug_assert_eq!(preset.num_layers(), 3);
                let sigma_brain = preset.shells[0].conductivity;
                let sigma_skull = preset.shells[1].conductivity;
                let inner_skull_radius = shell_radii[0];
                let outer_skull_radius = shell_radii[1];
                potential::potential_three_shell_approx_ary(
                    dipole,
                    electrode_pos,
                    inner_skull_radius,
                    outer_skull_radius,
                    sigma_brain,
                    sigma_skull,
                )
            }
            ElectromagneticModel::NShellExactSphericalLegendre => {
                let sigmas: Vec<f64> = preset.shells.iter().map(|s| s.conductivity).collect();
                potential::potential_n_shell_exact_spherical_legendre(
                    dipole,
                    electrode_pos,
                    shell_radii,
                    &sigmas,
                    preset.max_legendre_terms,
                    preset.min_legendre_terms,
                    preset.convergence,
                )
            }
        })
        .collect()
}

/// Builds the lead-field matrix `K` (rows = `3 * solution points`, cols =
/// electrodes) plus the set of solution points rejected for a zero or
/// non-finite column.
///
/// `surface_model` supplies the locally-fitted head surface used to
/// probe a per-electrode outer radius (the LSMAC deformation); `fit_params`
/// are the parameters the fusion/fit stage converged on.
///
/// Parallelizes over solution points, since with typically far more
/// solution points than electrodes that is the more expensive loop; each
/// worker's per-point row triplet is stack-allocated before being
/// written into its owned slice of the output.
pub fn build_lead_field(
    preset: &LeadFieldPreset,
    electrodes: &Pset,
    solution_points: &Pset,
    surface_model: &FitModelOnPoints,
    fit_params: &[(ParamKind, f64)],
) -> Result<(Array2<f64>, RejectedSet)> {
    if electrodes.is_empty() || solution_points.is_empty() {
        return Err(EsiError::InputInvalid(
            "lead field requires at least one electrode and one solution point".into(),
        ));
    }

    let electrode_positions: Vec<[f64; 3]> = electrodes
        .points()
        .iter()
        .map(|p| [p.x(), p.y(), p.z()])
        .collect();

    let base_outer_radius = surface_model.bounding().radius();

    let rows: Vec<[Vec<f64>; 3]> = solution_points
        .points()
        .par_iter()
        .map(|sp| {
            let position = [sp.x(), sp.y(), sp.z()];
            let local_outer = surface_model.surface_radius_towards(fit_params, position).max(1e-6);
            let shell_radii = preset.resolve_radii(local_outer);

            let dipoles = Dipole::unit_basis(position);
            [
                potential_row(preset, &dipoles[0], &electrode_positions, &shell_radii),
                potential_row(preset, &dipoles[1], &electrode_positions, &shell_radii),
                potential_row(preset, &dipoles[2], &electrode_positions, &shell_radii),
            ]
        })
        .collect();

    let numel = electrode_positions.len();
    let numsolp = solution_points.len();
    let mut k = Array2::<f64>::zeros((numsolp * 3, numel));
    let mut rejected = RejectedSet::new();

    for (sp_idx, triplet) in rows.iter().enumerate() {
        let mut degenerate = true;
        for (axis, row) in triplet.iter().enumerate() {
            for (col, &value) in row.iter().enumerate() {
                if !value.is_finite() {
                    return Err(EsiError::NumericDegenerate(format!(
                        "electrode {col} produced a non-finite potential at solution point {sp_idx}"
                    )));
                }
                if value != 0.0 {
                    degenerate = false;
                }
                k[[sp_idx * 3 + axis, col]] = value;
            }
        }
        if degenerate {
            tracing::debug!(solution_point = sp_idx, "lead field column is all-zero, rejecting");
            rejected.insert(sp_idx);
        }
    }

    Ok((k, rejected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use esi_geometry::Pset;

    fn unit_sphere_electrodes(n: usize) -> Pset {
        let coords: Vec<[f64; 3]> = (0..n)
            .map(|i| {
                let theta = i as f64 / n as f64 * std::f64::consts::TAU;
                [5.0 * theta.cos(), 5.0 * theta.sin(), 0.0]
            })
            .collect();
        Pset::from_coords(coords)
    }

    #[test]
    fn builds_a_correctly_shaped_matrix_with_no_rejections_for_interior_points() {
        let electrodes = unit_sphere_electrodes(8);
        let solution_points = Pset::from_coords(vec![[0.0, 0.0, 0.5], [0.5, 0.0, 0.0], [0.0, 0.5, 0.0]]);
        let surface_model = FitModelOnPoints::new(unit_sphere_electrodes(16));
        let preset = LeadFieldPreset::default();

        let (k, rejected) =
            build_lead_field(&preset, &electrodes, &solution_points, &surface_model, &[]).unwrap();

        assert_eq!(k.nrows(), 9);
        assert_eq!(k.ncols(), 8);
        assert!(rejected.is_empty());
        assert!(k.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn rejects_empty_inputs() {
        let electrodes = Pset::from_coords(Vec::<[f64; 3]>::new());
        let solution_points = unit_sphere_electrodes(3);
        let surface_model = FitModelOnPoints::new(unit_sphere_electrodes(8));
        let preset = LeadFieldPreset::default();

        let result = build_lead_field(&preset, &electrodes, &solution_points, &surface_model, &[]);
        assert!(result.is_err());
    }
}
