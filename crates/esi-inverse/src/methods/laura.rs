//! LAURA: the same Kronecker-free per-dimension solve as LORETA, but
//! against a distance-weighted graph Laplacian instead of the
//! normalized discrete one, and an identity regularizer instead of the
//! average-reference centering matrix.

use ndarray::Array2;

use esi_common::Result;
use esi_geometry::Pset;
use esi_linalg::{lu_solve, pinv_spd};
use esi_solution_points::{NeighborhoodGraph, RejectedSet};

use crate::laplacian::distance_weighted_laplacian;
use crate::method::{InverseMethod, InverseMethodConfig, LAURA_POWER};
use crate::operator::BuiltOperator;
use crate::shared::{per_source_inverse_energy_weights, reject_points_from_lead_field, regularization_schedule};

fn dimension_slice(k: &Array2<f64>, axis: usize) -> Array2<f64> {
    let numsp = k.nrows() / 3;
    let numel = k.ncols();
    Array2::from_shape_fn((numel, numsp), |(e, s)| k[[s * 3 + axis, e]])
}

pub fn build(
    k: &Array2<f64>,
    rejected: &RejectedSet,
    graph: &NeighborhoodGraph,
    points: &Pset,
    config: &InverseMethodConfig,
) -> Result<BuiltOperator> {
    let k = reject_points_from_lead_field(k, rejected);
    let numel = k.ncols();
    let numsp = k.nrows() / 3;

    let weights = per_source_inverse_energy_weights(&k);
    let a = distance_weighted_laplacian(graph, points, LAURA_POWER);
    let wdiag = Array2::from_shape_fn((numsp, numsp), |(i, j)| if i == j { weights[i] } else { 0.0 });
    // `A` is already a (symmetric) Laplacian, so the quadratic smoothness
    // penalty is `W A A W` rather than `W Aᵀ A W`.
    let c = wdiag.dot(&a).dot(&a).dot(&wdiag);
    let identity = Array2::<f64>::eye(numel);

    let mut x_full = Array2::<f64>::zeros((numsp * 3, numel));
    let mut m = Array2::<f64>::zeros((numel, numel));
    for axis in 0..3 {
        let k_d = dimension_slice(&k, axis);
        let x_d = lu_solve(&c, &k_d.t().to_owned())?;
        for s in 0..numsp {
            for e in 0..numel {
                x_full[[s * 3 + axis, e]] = x_d[[s, e]];
            }
        }
        m = m + k_d.dot(&x_d);
    }

    let regularizations = regularization_schedule(InverseMethod::Laura, &m, config.num_saved_regularizations);
    // Every level uses the SPD pseudo-inverse uniformly; see the design
    // notes on why this simplifies the direct-inverse-at-r=0 split.
    let matrices = regularizations
        .iter()
        .map(|&r| {
            let regularized = &m + &(r * &identity);
            x_full.dot(&pinv_spd(&regularized))
        })
        .collect();

    Ok(BuiltOperator { regularizations, matrices })
}
