//! Dale: the MN operator with a per-row noise-sensitivity
//! standardization, each row divided by `(r * row H rowᵀ)^0.25` rather
//! than the full minimum-norm whitening of sLORETA.

use ndarray::Array2;

use esi_linalg::{centering_matrix, pinv_spd};
use esi_solution_points::RejectedSet;

use crate::method::{InverseMethod, InverseMethodConfig};
use crate::operator::BuiltOperator;
use crate::shared::{reject_points_from_lead_field, regularization_schedule};

/// Dale's standardization exponent. The reference declarations call for
/// a noise-normalized quarter power rather than the half power sLORETA
/// uses, since Dale standardizes row-by-row instead of per-source block.
const STANDARDIZATION_EXPONENT: f64 = 0.25;

fn standardize_rows(t: &Array2<f64>, h: &Array2<f64>, r: f64) -> Array2<f64> {
    let mut out = t.clone();
    for row in 0..t.nrows() {
        let row_vec = t.row(row);
        let mut s = 0.0;
        for a in 0..h.nrows() {
            let mut hv = 0.0;
            for b in 0..h.ncols() {
                hv += h[[a, b]] * row_vec[b];
            }
            s += row_vec[a] * hv;
        }
        s *= r;
        let scale = if s > 1e-300 { 1.0 / s.powf(STANDARDIZATION_EXPONENT) } else { 0.0 };
        for col in 0..t.ncols() {
            out[[row, col]] *= scale;
        }
    }
    out
}

pub fn build(k: &Array2<f64>, rejected: &RejectedSet, config: &InverseMethodConfig) -> BuiltOperator {
    let k = reject_points_from_lead_field(k, rejected);
    let numel = k.ncols();

    let m = k.t().dot(&k);
    let h = centering_matrix(numel);
    let regularizations = regularization_schedule(InverseMethod::Dale, &m, config.num_saved_regularizations);

    let matrices = regularizations
        .iter()
        .map(|&r| {
            let regularized = &m + &(r * &h);
            let t = k.dot(&pinv_spd(&regularized));
            standardize_rows(&t, &h, r.max(f64::MIN_POSITIVE))
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
        ]);
        let rejected = RejectedSet::new();
        let config = InverseMethodConfig { method: InverseMethod::Dale, num_saved_regularizations: 3 };
        let built = build(&k, &rejected, &config);
        assert_eq!(built.matrices.len(), 3);
        for m in &built.matrices {
            assert_eq!(m.dim(), (4, 2));
            assert!(m.iter().all(|v| v.is_finite()));
        }
    }
}
