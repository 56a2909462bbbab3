//! Radius-based adjacency over a point cloud, built in parallel over the
//! outer (row) index with per-thread scratch, then merged.

use rayon::prelude::*;

use esi_geometry::Pset;

use crate::class::NeighborhoodClass;

/// Symmetric adjacency lists over a point set's original indices.
#[derive(Debug, Clone, Default)]
pub struct NeighborhoodGraph {
    adjacency: Vec<Vec<usize>>,
}

impl NeighborhoodGraph {
    /// Radius-threshold adjacency: point `i` and `j` are neighbors iff
    /// `distance(i, j) <= radius`. Naturally symmetric since distance is
    /// symmetric; no truncation is applied, so a degenerate point cloud
    /// (irregular spacing) can locally exceed `class`'s nominal capacity.
    pub fn build(pset: &Pset, radius: f64) -> Self {
        let points = pset.points();
        let adjacency: Vec<Vec<usize>> = points
            .par_iter()
            .enumerate()
            .map(|(i, p)| {
                points
                    .iter()
                    .enumerate()
                    .filter(|(j, q)| *j != i && p.distance(q) <= radius)
                    .map(|(j, _)| j)
                    .collect()
            })
            .collect();
        Self { adjacency }
    }

    pub fn for_class(pset: &Pset, step: f64, class: NeighborhoodClass) -> Self {
        Self::build(pset, class.radius(step))
    }

    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn neighbors(&self, i: usize) -> &[usize] {
        &self.adjacency[i]
    }

    pub fn degree(&self, i: usize) -> usize {
        self.adjacency[i].len()
    }

    pub fn mean_degree(&self) -> f64 {
        if self.adjacency.is_empty() {
            return 0.0;
        }
        self.adjacency.iter().map(|n| n.len()).sum::<usize>() as f64 / self.adjacency.len() as f64
    }

    pub fn is_symmetric(&self) -> bool {
        self.adjacency.iter().enumerate().all(|(i, neighbors)| {
            neighbors
                .iter()
                .all(|&j| self.adjacency[j].contains(&i))
        })
    }

    pub(crate) fn adjacency_mut(&mut self) -> &mut Vec<Vec<usize>> {
        &mut self.adjacency
    }

    pub(crate) fn adjacency(&self) -> &[Vec<usize>] {
        &self.adjacency
    }

    pub(crate) fn from_adjacency(adjacency: Vec<Vec<usize>>) -> Self {
        Self { adjacency }
    }
}
