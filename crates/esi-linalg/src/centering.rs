//! The average-reference centering matrix `H = I - (1/n) * 1 * 1^T`.

use ndarray::Array2;

/// `H(n)`: symmetric, rank `n-1`, idempotent (`H*H = H`).
pub fn centering_matrix(n: usize) -> Array2<f64> {
    let mut h = Array2::from_elem((n, n), -1.0 / n as f64);
    for i in 0..n {
        h[[i, i]] += 1.0;
    }
    h
}
