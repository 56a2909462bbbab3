//! Pieces common to every builder: rejected-column clearing, the SPD
//! regularization schedule, and the per-source weight used by WMN.

use ndarray::Array2;

use esi_linalg::eigen3::Sym3;
use esi_linalg::largest_eigenvalue;
use esi_solution_points::RejectedSet;

use crate::method::InverseMethod;

/// Reads a 3x3 block of `m` starting at `(row0, col0)` out as a [`Sym3`].
pub fn block3(m: &Array2<f64>, row0: usize, col0: usize) -> Sym3 {
    let mut out = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            out[i][j] = m[[row0 + i, col0 + j]];
        }
    }
    out
}

pub fn sym3_to_array(s: Sym3) -> Array2<f64> {
    Array2::from_shape_fn((3, 3), |(i, j)| s[i][j])
}

/// Inverse of a 3x3 SPD matrix via its eigendecomposition; non-positive
/// eigenvalues (rounding noise) are dropped rather than inverted.
pub fn invert_spd3(m: Sym3) -> Sym3 {
    let e = esi_linalg::eigen3::eig_sym3(&m);
    let inv: [f64; 3] = [
        if e.values[0] > 1e-300 { 1.0 / e.values[0] } else { 0.0 },
        if e.values[1] > 1e-300 { 1.0 / e.values[1] } else { 0.0 },
        if e.values[2] > 1e-300 { 1.0 / e.values[2] } else { 0.0 },
    ];
    let mut out = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            let mut acc = 0.0;
            for k in 0..3 {
                acc += e.vectors[k][i] * inv[k] * e.vectors[k][j];
            }
            out[i][j] = acc;
        }
    }
    out
}

/// Square root of a 3x3 SPD matrix via its eigendecomposition, used by
/// eLORETA's per-source weight update; non-positive eigenvalues are
/// dropped rather than taking the root of a negative number.
pub fn sqrt_spd3(m: Sym3) -> Sym3 {
    let e = esi_linalg::eigen3::eig_sym3(&m);
    let root: [f64; 3] = [
        if e.values[0] > 0.0 { e.values[0].sqrt() } else { 0.0 },
        if e.values[1] > 0.0 { e.values[1].sqrt() } else { 0.0 },
        if e.values[2] > 0.0 { e.values[2].sqrt() } else { 0.0 },
    ];
    let mut out = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            let mut acc = 0.0;
            for k in 0..3 {
                acc += e.vectors[k][i] * root[k] * e.vectors[k][j];
            }
            out[i][j] = acc;
        }
    }
    out
}

/// Frobenius distance between two 3x3 matrices.
pub fn frobenius_distance3(a: Sym3, b: Sym3) -> f64 {
    let mut acc = 0.0;
    for i in 0..3 {
        for j in 0..3 {
            let d = a[i][j] - b[i][j];
            acc += d * d;
        }
    }
    acc.sqrt()
}

pub fn mat3_vec_rows(a: Sym3, rows: &Array2<f64>) -> Array2<f64> {
    let ncols = rows.ncols();
    Array2::from_shape_fn((3, ncols), |(i, c)| {
        (0..3).map(|k| a[i][k] * rows[[k, c]]).sum::<f64>()
    })
}

/// `K` with every row belonging to a rejected solution point (all three
/// of its x/y/z rows) zeroed out, per `RejectPointsFromLeadField`.
pub fn reject_points_from_lead_field(k: &Array2<f64>, rejected: &RejectedSet) -> Array2<f64> {
    let mut out = k.clone();
    for row in 0..out.nrows() {
        if rejected.contains(row / 3) {
            for col in 0..out.ncols() {
                out[[row, col]] = 0.0;
            }
        }
    }
    out
}

/// `regv[r] = r * lambda_max / down_method`, `r` in `0..num_levels`.
/// `lambda_max` is clamped to 1.0 if non-finite by [`largest_eigenvalue`]
/// itself. Dale's `r = 0` level substitutes `regv[1] / 10` since a zero
/// regularization is degenerate for its standardization step.
pub fn regularization_schedule(method: InverseMethod, m: &Array2<f64>, num_levels: usize) -> Vec<f64> {
    let lambda_max = largest_eigenvalue(m);
    let down = method.regularization_down();
    let mut regv: Vec<f64> = (0..num_levels).map(|r| r as f64 * lambda_max / down).collect();
    if method == InverseMethod::Dale && num_levels >= 2 {
        regv[0] = regv[1] / 10.0;
    }
    regv
}

/// Per-source weight `W_i = 1/sqrt(column-energy_i)`, averaged over the
/// x/y/z row-triplet of source `i` so all three rows of a solution point
/// share one weight (WMN).
pub fn per_source_inverse_energy_weights(k: &Array2<f64>) -> Vec<f64> {
    let num_sources = k.nrows() / 3;
    let mut weights = vec![0.0; num_sources];
    for i in 0..num_sources {
        let mut energy = 0.0;
        for axis in 0..3 {
            let row = k.row(i * 3 + axis);
            energy += row.iter().map(|v| v * v).sum::<f64>();
        }
        let avg_energy = energy / 3.0;
        weights[i] = if avg_energy > 1e-300 { 1.0 / avg_energy.sqrt() } else { 0.0 };
    }
    weights
}
