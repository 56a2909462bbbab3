//! Graph Laplacians over the solution-point neighborhood graph: LORETA's
//! normalized discrete Laplacian and LAURA's distance-weighted variant.

use ndarray::Array2;

use esi_geometry::Pset;
use esi_solution_points::NeighborhoodGraph;

/// LORETA's `B = A0 - I` where `A0 = 0.5*(I + D^-1)*A1` and `A1_ij =
/// A1_ji = 1/|N_i|` for every neighbor pair (equal edge weights). Points
/// with zero neighbors get an all-zero row (their column in the
/// lead-field is expected to already be rejected upstream).
pub fn normalized_discrete_laplacian(graph: &NeighborhoodGraph) -> Array2<f64> {
    let n = graph.len();
    let mut a1 = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        let degree = graph.degree(i);
        if degree == 0 {
            continue;
        }
        let w = 1.0 / degree as f64;
        for &j in graph.neighbors(i) {
            a1[[i, j]] = w;
        }
    }

    let mut b = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        let d_inv = if graph.degree(i) == 0 { 0.0 } else { 1.0 };
        for j in 0..n {
            let a0 = 0.5 * ((if i == j { 1.0 } else { 0.0 }) + d_inv * a1[[i, j]]);
            b[[i, j]] = a0 - if i == j { 1.0 } else { 0.0 };
        }
    }
    b
}

/// LAURA's distance-weighted graph Laplacian: off-diagonal entries
/// `-1/||p_i - p_j||^power` for neighbor pairs, diagonal the negative row
/// sum so each row sums to zero (a proper graph Laplacian).
pub fn distance_weighted_laplacian(graph: &NeighborhoodGraph, points: &Pset, power: f64) -> Array2<f64> {
    let n = graph.len();
    let mut a = Array2::<f64>::zeros((n, n));
    let pts = points.points();
    for i in 0..n {
        let mut row_sum = 0.0;
        for &j in graph.neighbors(i) {
            let d = pts[i].distance(&pts[j]).max(1e-9);
            let w = 1.0 / d.powf(power);
            a[[i, j]] = -w;
            row_sum += w;
        }
        a[[i, i]] = row_sum;
    }
    a
}
