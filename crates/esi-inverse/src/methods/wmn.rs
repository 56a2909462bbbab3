//! Weighted minimum norm: rescales every source's row-triplet by
//! `1/column-energy` before the MN skeleton, so shallow/weak sources
//! are not systematically under-weighted relative to strong ones.

use ndarray::Array2;

use esi_linalg::{centering_matrix, pinv_spd};
use esi_solution_points::RejectedSet;

use crate::method::{InverseMethod, InverseMethodConfig};
use crate::operator::BuiltOperator;
use crate::shared::{per_source_inverse_energy_weights, reject_points_from_lead_field, regularization_schedule};

fn scale_rows_by_source_weight_squared(k: &Array2<f64>, weights: &[f64]) -> Array2<f64> {
    let mut out = k.clone();
    for (i, &w) in weights.iter().enumerate() {
        let w2 = w * w;
        for axis in 0..3 {
            for col in 0..out.ncols() {
                out[[i * 3 + axis, col]] *= w2;
            }
        }
    }
    out
}

pub fn build(k: &Array2<f64>, rejected: &RejectedSet, config: &InverseMethodConfig) -> BuiltOperator {
    let k = reject_points_from_lead_field(k, rejected);
    let numel = k.ncols();

    let weights = per_source_inverse_energy_weights(&k);
    let weighted = scale_rows_by_source_weight_squared(&k, &weights);

    let m = k.t().dot(&weighted);
    let h = centering_matrix(numel);
    let regularizations = regularization_schedule(InverseMethod::Wmn, &m, config.num_saved_regularizations);

    let matrices = regularizations
        .iter()
        .map(|&r| {
            let regularized = &m + &(r * &h);
            weighted.dot(&pinv_spd(&regularized))
        })
        .collect();

    BuiltOperator { regularizations, matrices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn produces_finite_operators_of_lead_field_shape() {
        let k = arr2(&[[1.0, 0.5], [0.2, 1.0], [0.0, 0.3], [0.4, 0.1]]);
        let rejected = RejectedSet::new();
        let config = InverseMethodConfig { method: InverseMethod::Wmn, num_saved_regularizations: 3 };
        let built = build(&k, &rejected, &config);
        assert_eq!(built.matrices.len(), 3);
        for m in &built.matrices {
            assert_eq!(m.dim(), (4, 2));
            assert!(m.iter().all(|v| v.is_finite()));
        }
    }
}
