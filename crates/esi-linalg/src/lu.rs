//! Pivoted LU factorization, used to solve `W X = B` once per Kronecker
//! dimension without ever materializing `W ⊗ I3`.

use esi_common::{EsiError, Result};
use ndarray::{Array1, Array2};

/// An LU factorization of a square matrix with row pivoting: `P*A = L*U`.
/// `lu` packs `L` (unit lower triangular, diagonal implicit) and `U`
/// (upper triangular) into one matrix, Doolittle-style.
pub struct LuFactorization {
    lu: Array2<f64>,
    piv: Vec<usize>,
    n: usize,
}

impl LuFactorization {
    /// Factorize `a` once; reuse via [`Self::solve`] for every right-hand
    /// side sharing the same matrix (e.g. the three Kronecker dimensions).
    pub fn new(a: &Array2<f64>) -> Result<Self> {
        let n = a.nrows();
        if n != a.ncols() {
            return Err(EsiError::InputInvalid(
                "LU factorization requires a square matrix".into(),
            ));
        }

        let mut lu = a.clone();
        let mut piv: Vec<usize> = (0..n).collect();

        for k in 0..n {
            let mut max_row = k;
            let mut max_val = lu[[k, k]].abs();
            for i in (k + 1)..n {
                let v = lu[[i, k]].abs();
                if v > max_val {
                    max_val = v;
                    max_row = i;
                }
            }

            if max_val < 1e-300 {
                return Err(EsiError::NumericDegenerate(
                    "LU factorization encountered a (near-)singular pivot".into(),
                ));
            }

            if max_row != k {
                for col in 0..n {
                    let tmp = lu[[k, col]];
                    lu[[k, col]] = lu[[max_row, col]];
                    lu[[max_row, col]] = tmp;
                }
                piv.swap(k, max_row);
            }

            let pivot = lu[[k, k]];
            for i in (k + 1)..n {
                let factor = lu[[i, k]] / pivot;
                lu[[i, k]] = factor;
                for col in (k + 1)..n {
                    let ukcol = lu[[k, col]];
                    lu[[i, col]] -= factor * ukcol;
                }
            }
        }

        Ok(Self { lu, piv, n })
    }

    /// Solve `A x = b` for a single right-hand side.
    pub fn solve_vec(&self, b: &Array1<f64>) -> Array1<f64> {
        let n = self.n;
        let mut y = Array1::zeros(n);
        for i in 0..n {
            let mut sum = b[self.piv[i]];
            for j in 0..i {
                sum -= self.lu[[i, j]] * y[j];
            }
            y[i] = sum;
        }

        let mut x = Array1::zeros(n);
        for i in (0..n).rev() {
            let mut sum = y[i];
            for j in (i + 1)..n {
                sum -= self.lu[[i, j]] * x[j];
            }
            x[i] = sum / self.lu[[i, i]];
        }
        x
    }

    /// Solve `A X = B` column by column, reusing the same factorization.
    pub fn solve_mat(&self, b: &Array2<f64>) -> Array2<f64> {
        let (n, cols) = (b.nrows(), b.ncols());
        let mut out = Array2::zeros((n, cols));
        for c in 0..cols {
            let col = b.column(c).to_owned();
            let x = self.solve_vec(&col);
            out.column_mut(c).assign(&x);
        }
        out
    }
}

/// Convenience one-shot solve of `A X = B`.
pub fn lu_solve(a: &Array2<f64>, b: &Array2<f64>) -> Result<Array2<f64>> {
    let fact = LuFactorization::new(a)?;
    Ok(fact.solve_mat(b))
}
