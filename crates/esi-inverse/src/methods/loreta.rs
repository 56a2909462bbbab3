//! LORETA: smoothness-regularized inverse via a per-dimension,
//! Kronecker-free solve against the normalized discrete Laplacian.

use ndarray::Array2;

use esi_common::Result;
use esi_linalg::{centering_matrix, lu_solve, pinv_spd};
use esi_solution_points::{NeighborhoodGraph, RejectedSet};

use crate::laplacian::normalized_discrete_laplacian;
use crate::method::{InverseMethod, InverseMethodConfig};
use crate::operator::BuiltOperator;
use crate::shared::{per_source_inverse_energy_weights, reject_points_from_lead_field, regularization_schedule};

/// Extracts the `Nelec x Nsp` slice of `k` (shape `Nsp*3 x Nelec`)
/// belonging to dimension `axis` (0=x, 1=y, 2=z), transposed so columns
/// are solution points.
fn dimension_slice(k: &Array2<f64>, axis: usize) -> Array2<f64> {
    let numsp = k.nrows() / 3;
    let numel = k.ncols();
    Array2::from_shape_fn((numel, numsp), |(e, s)| k[[s * 3 + axis, e]])
}

pub fn build(
    k: &Array2<f64>,
    rejected: &RejectedSet,
    graph: &NeighborhoodGraph,
    config: &InverseMethodConfig,
) -> Result<BuiltOperator> {
    let k = reject_points_from_lead_field(k, rejected);
    let numel = k.ncols();
    let numsp = k.nrows() / 3;

    let weights = per_source_inverse_energy_weights(&k);
    let b = normalized_discrete_laplacian(graph);
    let wdiag = Array2::from_shape_fn((numsp, numsp), |(i, j)| if i == j { weights[i] } else { 0.0 });
    let c = wdiag.dot(&b.t()).dot(&b).dot(&wdiag);

    // Solve C X_d = K_dᵀ per dimension, sharing one LU factorization.
    let mut x_full = Array2::<f64>::zeros((numsp * 3, numel));
    let mut m = Array2::<f64>::zeros((numel, numel));
    for axis in 0..3 {
        let k_d = dimension_slice(&k, axis); // Nelec x Nsp
        let x_d = lu_solve(&c, &k_d.t().to_owned())?; // Nsp x Nelec
        for s in 0..numsp {
            for e in 0..numel {
                x_full[[s * 3 + axis, e]] = x_d[[s, e]];
            }
        }
        m = m + k_d.dot(&x_d);
    }

    let h = centering_matrix(numel);
    let regularizations = regularization_schedule(InverseMethod::Loreta, &m, config.num_saved_regularizations);
    let matrices = regularizations
        .iter()
        .map(|&r| {
            let regularized = &m + &(r * &h);
            x_full.dot(&pinv_spd(&regularized))
        })
        .collect();

    Ok(BuiltOperator { regularizations, matrices })
}
