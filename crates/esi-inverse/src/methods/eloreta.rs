//! eLORETA: a fixed-point iteration over per-source 3x3 weight blocks,
//! solved entirely in electrode space so the `Ns3 x Ns3` Kronecker
//! expansion is never materialized.

use ndarray::Array2;

use esi_linalg::eigen3::Sym3;
use esi_linalg::{centering_matrix, pinv_spd};
use esi_solution_points::RejectedSet;

use crate::method::{InverseMethod, InverseMethodConfig, ELORETA_CONVERGENCE, ELORETA_MAX_ITERATIONS};
use crate::operator::BuiltOperator;
use crate::shared::{
    frobenius_distance3, invert_spd3, mat3_vec_rows, reject_points_from_lead_field, regularization_schedule,
    sqrt_spd3,
};

fn source_rows(k: &Array2<f64>, i: usize) -> Array2<f64> {
    k.slice(ndarray::s![i * 3..i * 3 + 3, ..]).to_owned()
}

/// Electrode-space Gram matrix `sum_i K_iᵀ W_i⁻¹ K_i` built one source
/// block at a time.
fn weighted_gram(k: &Array2<f64>, inv_weights: &[Sym3]) -> Array2<f64> {
    let numel = k.ncols();
    let mut m = Array2::<f64>::zeros((numel, numel));
    for (i, &w) in inv_weights.iter().enumerate() {
        let k_i = source_rows(k, i);
        let weighted = mat3_vec_rows(w, &k_i); // 3 x Nelec
        m = m + k_i.t().dot(&weighted);
    }
    m
}

pub fn build(k: &Array2<f64>, rejected: &RejectedSet, config: &InverseMethodConfig) -> BuiltOperator {
    let k = reject_points_from_lead_field(k, rejected);
    let numel = k.ncols();
    let num_sources = k.nrows() / 3;

    let m_schedule_basis = k.t().dot(&k);
    let h = centering_matrix(numel);
    let regularizations =
        regularization_schedule(InverseMethod::ELoreta, &m_schedule_basis, config.num_saved_regularizations);

    let matrices = regularizations
        .iter()
        .map(|&r| {
            let mut weights: Vec<Sym3> = vec![[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]; num_sources];
            let mut inv_weights: Vec<Sym3> = weights.clone();

            for _ in 0..ELORETA_MAX_ITERATIONS {
                let gram = weighted_gram(&k, &inv_weights) + &(r * &h);
                let minv = pinv_spd(&gram);

                let mut max_delta = 0.0_f64;
                let mut next_weights = Vec::with_capacity(num_sources);
                for i in 0..num_sources {
                    let k_i = source_rows(&k, i);
                    let block = k_i.dot(&minv).dot(&k_i.t());
                    let sym: Sym3 = [
                        [block[[0, 0]], block[[0, 1]], block[[0, 2]]],
                        [block[[1, 0]], block[[1, 1]], block[[1, 2]]],
                        [block[[2, 0]], block[[2, 1]], block[[2, 2]]],
                    ];
                    let new_w = sqrt_spd3(sym);
                    max_delta = max_delta.max(frobenius_distance3(new_w, weights[i]));
                    next_weights.push(new_w);
                }
                weights = next_weights;
                inv_weights = weights.iter().map(|&w| invert_spd3(w)).collect();

                if max_delta < ELORETA_CONVERGENCE {
                    break;
                }
            }

            let gram = weighted_gram(&k, &inv_weights) + &(r * &h);
            let minv = pinv_spd(&gram);

            let mut j = Array2::<f64>::zeros((num_sources * 3, numel));
            for i in 0..num_sources {
                let k_i = source_rows(&k, i);
                let weighted = mat3_vec_rows(inv_weights[i], &k_i).dot(&minv);
                for a in 0..3 {
                    for c in 0..numel {
                        j[[i * 3 + a, c]] = weighted[[a, c]];
                    }
                }
            }
            j
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
        let k = arr2(&[
            [1.0, 0.5, 0.1],
            [0.2, 1.0, 0.3],
            [0.0, 0.3, 0.2],
            [0.4, 0.1, 0.9],
            [0.1, 0.2, 0.0],
            [0.3, 0.0, 0.4],
        ]);
        let rejected = RejectedSet::new();
        let config = InverseMethodConfig { method: InverseMethod::ELoreta, num_saved_regularizations: 2 };
        let built = build(&k, &rejected, &config);
        assert_eq!(built.matrices.len(), 2);
        for m in &built.matrices {
            assert_eq!(m.dim(), (6, 3));
            assert!(m.iter().all(|v| v.is_finite()));
        }
    }
}
