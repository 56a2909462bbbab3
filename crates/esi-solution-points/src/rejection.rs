//! Isolated-point and outside-head rejection.

use std::collections::HashSet;

use esi_geometry::BoundingBox;

use crate::graph::NeighborhoodGraph;

/// Bit-set over original solution-point indices: set members are
/// excluded from the lead field and inverse operators.
#[derive(Debug, Clone, Default)]
pub struct RejectedSet {
    indices: HashSet<usize>,
}

impl RejectedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, index: usize) {
        self.indices.insert(index);
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }
}

/// Iteratively marks points with zero remaining neighbors (after
/// removing already-rejected points from the graph) until a fixed
/// point: removing a point can reduce its only neighbor's degree to
/// zero in turn.
pub fn reject_single_neighbors(graph: &NeighborhoodGraph) -> RejectedSet {
    let mut rejected = RejectedSet::new();
    loop {
        let mut changed = false;
        for i in 0..graph.len() {
            if rejected.contains(i) {
                continue;
            }
            let live_degree = graph
                .neighbors(i)
                .iter()
                .filter(|&&j| !rejected.contains(j))
                .count();
            if live_degree == 0 {
                rejected.insert(i);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    rejected
}

/// A point is outside the head if it lies outside the head surface's
/// bounding box, inflated by `margin` (a fraction of each axis'
/// half-extent) to tolerate points exactly on the hull.
pub fn is_outside_head(point: [f64; 3], head_bounds: &BoundingBox, margin: f64) -> bool {
    for d in 0..3 {
        let pad = head_bounds.radius_axis(d) * margin;
        if point[d] < head_bounds.min[d] - pad || point[d] > head_bounds.max[d] + pad {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NeighborhoodGraph;
    use esi_geometry::Pset;

    #[test]
    fn rejects_isolated_point_with_no_neighbors() {
        let pset = Pset::from_coords([[0.0, 0.0, 0.0], [100.0, 0.0, 0.0]]);
        let g = NeighborhoodGraph::build(&pset, 1.0);
        let rejected = reject_single_neighbors(&g);
        assert_eq!(rejected.len(), 2);
    }

    #[test]
    fn chain_rejection_propagates_to_the_new_leaf() {
        // A - B - C, radius only covers A-B and B-C; if we pre-seed a
        // graph where C's only neighbor B gets isolated, it should
        // cascade.
        let pset = Pset::from_coords([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        let g = NeighborhoodGraph::build(&pset, 1.0);
        let rejected = reject_single_neighbors(&g);
        // all three are connected in a chain, none isolated.
        assert!(rejected.is_empty());
    }

    #[test]
    fn point_outside_inflated_bounds_is_detected() {
        let bounds = BoundingBox {
            min: [-1.0, -1.0, -1.0],
            max: [1.0, 1.0, 1.0],
        };
        assert!(is_outside_head([5.0, 0.0, 0.0], &bounds, 0.1));
        assert!(!is_outside_head([0.5, 0.0, 0.0], &bounds, 0.1));
    }
}
