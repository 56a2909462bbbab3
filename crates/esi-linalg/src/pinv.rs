//! Pseudo-inverse of a symmetric positive semi-definite matrix.

use crate::eigen::eig_sym;
use ndarray::Array2;

/// `PInv(M)` for SPD/SPSD `M`, via eigendecomposition: eigenvalues below
/// `eps_machine * n * sigma_max` are treated as numerically zero and their
/// contribution dropped, exactly as a truncated-SVD pseudo-inverse would.
/// Negative residual eigenvalues (rounding noise on a supposedly SPSD
/// input) are clamped to zero rather than inverted.
pub fn pinv_spd(m: &Array2<f64>) -> Array2<f64> {
    let n = m.nrows();
    assert_eq!(n, m.ncols(), "pinv_spd requires a square matrix");
    if n == 0 {
        return Array2::zeros((0, 0));
    }

    let decomp = eig_sym(m);
    let sigma_max = decomp
        .values
        .iter()
        .cloned()
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let tol = f64::EPSILON * n as f64 * sigma_max;

    let mut inv_values = vec![0.0; n];
    for (i, &lambda) in decomp.values.iter().enumerate() {
        if lambda > tol {
            inv_values[i] = 1.0 / lambda;
        }
    }

    let v = &decomp.vectors;
    let mut scaled = v.clone();
    for (mut col, &iv) in scaled.axis_iter_mut(ndarray::Axis(1)).zip(inv_values.iter()) {
        col.mapv_inplace(|x| x * iv);
    }
    scaled.dot(&v.t())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn identity_pinv_is_identity() {
        let m = Array2::eye(3);
        let p = pinv_spd(&m);
        for i in 0..3 {
            for j in 0..3 {
                let expect = if i == j { 1.0 } else { 0.0 };
                assert!((p[[i, j]] - expect).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn full_rank_spd_pinv_is_exact_inverse() {
        let m = arr2(&[[4.0, 1.0, 0.0], [1.0, 3.0, 0.5], [0.0, 0.5, 2.0]]);
        let p = pinv_spd(&m);
        let prod = m.dot(&p);
        for i in 0..3 {
            for j in 0..3 {
                let expect = if i == j { 1.0 } else { 0.0 };
                assert!((prod[[i, j]] - expect).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn rank_deficient_matrix_moore_penrose_identities_hold() {
        // rank-2 SPSD matrix (outer products of two orthogonal vectors)
        let u1 = arr2(&[[1.0], [0.0], [0.0]]);
        let u2 = arr2(&[[0.0], [1.0], [0.0]]);
        let m = 5.0 * u1.dot(&u1.t()) + 2.0 * u2.dot(&u2.t());
        let p = pinv_spd(&m);

        let mpm = m.dot(&p).dot(&m);
        let pmp = p.dot(&m).dot(&p);
        for i in 0..3 {
            for j in 0..3 {
                assert!((mpm[[i, j]] - m[[i, j]]).abs() < 1e-6);
                assert!((pmp[[i, j]] - p[[i, j]]).abs() < 1e-6);
            }
        }
        // null space direction maps to zero
        assert!(p[[2, 2]].abs() < 1e-8);
    }
}
