//! Standardized LORETA: the MN operator, then a per-source 3x3
//! standardization that divides out the resolution matrix's own
//! variance at that source.

use ndarray::Array2;

use esi_linalg::{centering_matrix, pinv_spd};
use esi_solution_points::RejectedSet;

use crate::method::{InverseMethod, InverseMethodConfig};
use crate::operator::BuiltOperator;
use crate::shared::{block3, mat3_vec_rows, reject_points_from_lead_field, regularization_schedule};

/// For every source `i`, replaces `T`'s row-triplet `T_i` (shape 3 x
/// Nelec) with `inv_sqrt_spd3(T_i K_i) T_i`, where `K_i` is `K`'s own
/// row-triplet for the same source (so `T_i K_i` is the resolution
/// matrix's 3x3 diagonal block at `i`).
fn standardize_rows(t: &Array2<f64>, k: &Array2<f64>) -> Array2<f64> {
    let num_sources = t.nrows() / 3;
    let mut out = t.clone();
    for i in 0..num_sources {
        let t_i = t.slice(ndarray::s![i * 3..i * 3 + 3, ..]).to_owned();
        let k_i = k.slice(ndarray::s![i * 3..i * 3 + 3, ..]).to_owned();
        let block = t_i.dot(&k_i.t());
        let sym = block3(&block, 0, 0);
        let standardizer = esi_linalg::inv_sqrt_spd3(&sym);
        let standardized = mat3_vec_rows(standardizer, &t_i);
        for r in 0..3 {
            for c in 0..t.ncols() {
                out[[i * 3 + r, c]] = standardized[[r, c]];
            }
        }
    }
    out
}

pub fn build(k: &Array2<f64>, rejected: &RejectedSet, config: &InverseMethodConfig) -> BuiltOperator {
    let k = reject_points_from_lead_field(k, rejected);
    let numel = k.ncols();

    let m = k.t().dot(&k);
    let h = centering_matrix(numel);
    let regularizations = regularization_schedule(InverseMethod::SLoreta, &m, config.num_saved_regularizations);

    let matrices = regularizations
        .iter()
        .map(|&r| {
            let regularized = &m + &(r * &h);
            let t = k.dot(&pinv_spd(&regularized));
            standardize_rows(&t, &k)
        })
        .collect();

    BuiltOperator { regularizations, matrices }
}
