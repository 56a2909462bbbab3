//! The resolution matrix `J K`: how an inverse operator smears a unit
//! dipole at one solution point across every other source.

use ndarray::Array2;

use esi_geometry::Pset;

/// The three serializable variants of a resolution matrix, matching the
/// builder's three optional output files.
#[derive(Debug, Clone)]
pub struct ResolutionMatrices {
    /// Full `Ns3 x Ns3` resolution matrix, row/column triplets per source.
    pub full: Array2<f64>,
    /// Per-source point-spread function: entry `(s, i)` is the Frobenius
    /// norm of the 3x3 block describing how much of source `i`'s unit
    /// dipole response lands at estimated source `s`. Column `i` is the
    /// PSF for source `i`.
    pub per_source: Array2<f64>,
    /// `per_source` transposed, so row `i` is the PSF for source `i`.
    pub transposed: Array2<f64>,
    /// Distance-weighted spatial spread of each source's PSF column: the
    /// RMS distance from source `i` to every other source, weighted by
    /// that source's share of the PSF energy.
    pub spatial_radius: Vec<f64>,
}

fn block_frobenius_norm(full: &Array2<f64>, row0: usize, col0: usize) -> f64 {
    let mut acc = 0.0;
    for r in 0..3 {
        for c in 0..3 {
            let v = full[[row0 + r, col0 + c]];
            acc += v * v;
        }
    }
    acc.sqrt()
}

/// `j` and `k` are both `Ns3 x Nelec` (our row-triplet convention), so the
/// resolution matrix is `j.dot(&k.t())`.
pub fn build_resolution_matrix(j: &Array2<f64>, k: &Array2<f64>, points: &Pset) -> ResolutionMatrices {
    let full = j.dot(&k.t());
    let num_sources = full.nrows() / 3;

    let mut per_source = Array2::<f64>::zeros((num_sources, num_sources));
    for s in 0..num_sources {
        for i in 0..num_sources {
            per_source[[s, i]] = block_frobenius_norm(&full, s * 3, i * 3);
        }
    }
    let transposed = per_source.t().to_owned();

    let pts = points.points();
    let mut spatial_radius = vec![0.0; num_sources];
    for i in 0..num_sources {
        let mut energy = 0.0;
        let mut weighted_sq_dist = 0.0;
        for s in 0..num_sources {
            let w = per_source[[s, i]] * per_source[[s, i]];
            let d = pts[s].distance(&pts[i]);
            energy += w;
            weighted_sq_dist += w * d * d;
        }
        spatial_radius[i] = if energy > 1e-300 { (weighted_sq_dist / energy).sqrt() } else { 0.0 };
    }

    ResolutionMatrices { full, per_source, transposed, spatial_radius }
}
