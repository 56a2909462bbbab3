//! Adaptive 26→18 reduction: start from the 18-class graph, then admit
//! 26-class corner neighbors for under-full points.

use esi_geometry::Pset;

use crate::class::NeighborhoodClass;
use crate::graph::NeighborhoodGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReductionMode {
    /// Refuse to admit a corner neighbor that is itself already at
    /// 18-class capacity.
    Strict,
    /// Admit corner neighbors regardless of the candidate's own degree.
    Lax,
}

/// Builds the 18-class graph, then for every point with degree below the
/// 18-class capacity, admits 26-class corner neighbors (points reachable
/// within the 26-class radius but not the 18-class one) up to the
/// 26-class capacity, subject to `mode`.
pub fn adaptive_26_to_18(pset: &Pset, step: f64, mode: ReductionMode) -> NeighborhoodGraph {
    let r18 = NeighborhoodClass::Eighteen.radius(step);
    let r26 = NeighborhoodClass::TwentySix.radius(step);
    let cap18 = NeighborhoodClass::Eighteen.capacity();
    let cap26 = NeighborhoodClass::TwentySix.capacity();

    let base18 = NeighborhoodGraph::build(pset, r18);
    let candidates26 = NeighborhoodGraph::build(pset, r26);

    let mut adjacency = base18.adjacency().to_vec();
    let n = adjacency.len();

    for i in 0..n {
        if adjacency[i].len() >= cap18 {
            continue;
        }
        for &j in candidates26.neighbors(i) {
            if adjacency[i].len() >= cap26 {
                break;
            }
            if adjacency[i].contains(&j) {
                continue;
            }
            let candidate_admissible = match mode {
                ReductionMode::Strict => adjacency[j].len() < cap18,
                ReductionMode::Lax => true,
            };
            if !candidate_admissible || adjacency[j].len() >= cap26 {
                continue;
            }
            adjacency[i].push(j);
            adjacency[j].push(i);
        }
    }

    NeighborhoodGraph::from_adjacency(adjacency)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube_grid(n: usize) -> Pset {
        let mut coords = Vec::with_capacity(n * n * n);
        for x in 0..n {
            for y in 0..n {
                for z in 0..n {
                    coords.push([x as f64, y as f64, z as f64]);
                }
            }
        }
        Pset::from_coords(coords)
    }

    #[test]
    fn lax_reduction_on_ten_cubed_grid_reaches_expected_mean_degree() {
        let pset = cube_grid(10);
        let step = pset.step();
        let g = adaptive_26_to_18(&pset, step, ReductionMode::Lax);

        let mean = g.mean_degree();
        assert!(mean >= 17.0 && mean <= 18.5, "mean degree {mean} out of range");

        for i in 0..g.len() {
            assert!(g.degree(i) <= 26);
        }
    }

    #[test]
    fn strict_reduction_never_exceeds_eighteen_class_capacity_for_recipients() {
        let pset = cube_grid(6);
        let step = pset.step();
        let g = adaptive_26_to_18(&pset, step, ReductionMode::Strict);
        let mean = g.mean_degree();
        assert!(mean >= 15.0 && mean <= 20.0, "mean degree {mean} out of range");
    }

    #[test]
    fn adjacency_remains_symmetric_after_reduction() {
        let pset = cube_grid(6);
        let step = pset.step();
        let g = adaptive_26_to_18(&pset, step, ReductionMode::Lax);
        assert!(g.is_symmetric());
    }
}
