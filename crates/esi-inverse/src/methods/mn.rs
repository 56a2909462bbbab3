//! Minimum norm: `M = K Kᵀ`, `J(r) = Kᵀ · PInv(M + r H)`.

use ndarray::Array2;

use esi_linalg::{centering_matrix, pinv_spd};
use esi_solution_points::RejectedSet;

use crate::method::{InverseMethod, InverseMethodConfig};
use crate::operator::BuiltOperator;
use crate::shared::{reject_points_from_lead_field, regularization_schedule};

pub fn build(k: &Array2<f64>, rejected: &RejectedSet, config: &InverseMethodConfig) -> BuiltOperator {
    let k = reject_points_from_lead_field(k, rejected);
    let numel = k.ncols();

    let m = k.t().dot(&k);
    let h = centering_matrix(numel);
    let regularizations = regularization_schedule(InverseMethod::Mn, &m, config.num_saved_regularizations);

    let matrices = regularizations
        .iter()
        .map(|&r| {
            let regularized = &m + &(r * &h);
            k.dot(&pinv_spd(&regularized))
        })
        .collect();

    BuiltOperator { regularizations, matrices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn produces_one_matrix_per_regularization_level_with_lead_field_shape() {
        let k = arr2(&[[1.0, 0.5], [0.2, 1.0], [0.0, 0.3], [0.4, 0.1]]);
        let rejected = RejectedSet::new();
        let config = InverseMethodConfig { method: InverseMethod::Mn, num_saved_regularizations: 4 };
        let built = build(&k, &rejected, &config);
        assert_eq!(built.matrices.len(), 4);
        for m in &built.matrices {
            assert_eq!(m.dim(), (4, 2));
            assert!(m.iter().all(|v| v.is_finite()));
        }
    }
}
