//! Symmetric N×N eigendecomposition via the cyclic Jacobi method.
//!
//! Ascending eigenvalue order, orthonormal eigenvectors. No dynamic
//! allocation beyond the output buffers and one scratch copy of the input.

use ndarray::{Array1, Array2};

/// Eigenvalues (ascending) and eigenvectors (columns, orthonormal) of a
/// symmetric matrix.
#[derive(Debug, Clone)]
pub struct EigenDecomposition {
    pub values: Array1<f64>,
    pub vectors: Array2<f64>,
}

const MAX_SWEEPS: usize = 100;

/// Decompose a symmetric matrix `m` (only the upper triangle is read).
///
/// Panics if `m` is not square. Convergence is governed by the
/// off-diagonal Frobenius norm falling below `n^2 * f64::EPSILON *
/// ||m||_F`, matching the accuracy LAPACK's `dsyev` gives on
/// well-conditioned inputs.
pub fn eig_sym(m: &Array2<f64>) -> EigenDecomposition {
    let n = m.nrows();
    assert_eq!(n, m.ncols(), "eig_sym requires a square matrix");

    if n == 0 {
        return EigenDecomposition {
            values: Array1::zeros(0),
            vectors: Array2::zeros((0, 0)),
        };
    }

    let mut a = m.clone();
    // symmetrize defensively: callers pass SPD/symmetric matrices, but
    // floating-point construction can leave tiny asymmetries.
    for i in 0..n {
        for j in (i + 1)..n {
            let avg = 0.5 * (a[[i, j]] + a[[j, i]]);
            a[[i, j]] = avg;
            a[[j, i]] = avg;
        }
    }

    let mut v = Array2::eye(n);
    let norm: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt().max(1.0);
    let tol = (n * n) as f64 * f64::EPSILON * norm;

    for _sweep in 0..MAX_SWEEPS {
        let mut off = 0.0;
        for p in 0..n {
            for q in (p + 1)..n {
                off += a[[p, q]] * a[[p, q]];
            }
        }
        if off.sqrt() < tol {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = a[[p, q]];
                if apq.abs() < f64::EPSILON * norm {
                    continue;
                }

                let app = a[[p, p]];
                let aqq = a[[q, q]];
                let theta = (aqq - app) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let t = if theta == 0.0 { 1.0 } else { t };
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for k in 0..n {
                    let akp = a[[k, p]];
                    let akq = a[[k, q]];
                    a[[k, p]] = c * akp - s * akq;
                    a[[k, q]] = s * akp + c * akq;
                }
                for k in 0..n {
                    let apk = a[[p, k]];
                    let aqk = a[[q, k]];
                    a[[p, k]] = c * apk - s * aqk;
                    a[[q, k]] = s * apk + c * aqk;
                }

                for k in 0..n {
                    let vkp = v[[k, p]];
                    let vkq = v[[k, q]];
                    v[[k, p]] = c * vkp - s * vkq;
                    v[[k, q]] = s * vkp + c * vkq;
                }
            }
        }
    }

    let mut values: Vec<f64> = (0..n).map(|i| a[[i, i]]).collect();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| values[i].partial_cmp(&values[j]).unwrap());

    let mut sorted_values = Array1::zeros(n);
    let mut sorted_vectors = Array2::zeros((n, n));
    for (new_col, &old_col) in order.iter().enumerate() {
        sorted_values[new_col] = values[old_col];
        for row in 0..n {
            sorted_vectors[[row, new_col]] = v[[row, old_col]];
        }
    }
    values.clear();

    EigenDecomposition {
        values: sorted_values,
        vectors: sorted_vectors,
    }
}

/// Largest eigenvalue of a symmetric matrix. Used by the regularization
/// schedule (`regv[r] = r * lambda_max / down`). Returns 1.0 if the
/// computed value is non-finite, clamping rather than propagating NaN/Inf.
pub fn largest_eigenvalue(m: &Array2<f64>) -> f64 {
    let decomp = eig_sym(m);
    let mut lambda_max = f64::NEG_INFINITY;
    for &v in decomp.values.iter() {
        if v.is_nan() || lambda_max.is_nan() {
            lambda_max = f64::NAN;
        } else if v > lambda_max {
            lambda_max = v;
        }
    }
    if lambda_max.is_finite() {
        lambda_max
    } else {
        1.0
    }
}
