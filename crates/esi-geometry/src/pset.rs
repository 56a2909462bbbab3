//! An ordered point set with the summary statistics the fitters and the
//! neighborhood graph builder need: bounding box, step (median nearest
//! distance), medoid, centroid, downsampling.

use rayon::prelude::*;

use crate::bounding_box::BoundingBox;
use crate::point::Point;

#[derive(Debug, Clone, Default)]
pub struct Pset {
    points: Vec<Point>,
}

impl Pset {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn from_coords(coords: impl IntoIterator<Item = [f64; 3]>) -> Self {
        let points = coords
            .into_iter()
            .enumerate()
            .map(|(i, c)| Point::new(c, i))
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(self.points.iter().map(|p| &p.coords))
    }

    /// Centroid (arithmetic mean) of every point.
    pub fn centroid(&self) -> [f64; 3] {
        let n = self.points.len().max(1) as f64;
        let mut c = [0.0; 3];
        for p in &self.points {
            for d in 0..3 {
                c[d] += p.coords[d];
            }
        }
        for d in 0..3 {
            c[d] /= n;
        }
        c
    }

    /// The point minimizing the sum of distances to every other point.
    pub fn medoid(&self) -> Option<&Point> {
        if self.points.is_empty() {
            return None;
        }
        self.points
            .par_iter()
            .map(|candidate| {
                let sum: f64 = self.points.iter().map(|p| candidate.distance(p)).sum();
                (candidate, sum)
            })
            .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .map(|(p, _)| p)
    }

    /// Median, over all points, of each point's distance to its nearest
    /// neighbor. Used as the characteristic inter-point spacing ("step")
    /// feeding the neighborhood-graph radii.
    pub fn step(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        let mut nearest: Vec<f64> = self
            .points
            .par_iter()
            .map(|p| {
                self.points
                    .iter()
                    .filter(|q| q.original_index != p.original_index)
                    .map(|q| p.distance(q))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();
        nearest.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let mid = nearest.len() / 2;
        if nearest.len() % 2 == 0 {
            0.5 * (nearest[mid - 1] + nearest[mid])
        } else {
            nearest[mid]
        }
    }

    /// Evenly-strided downsample to at most `target` points. Keeps the
    /// first and last point so the hull is preserved.
    pub fn downsample(&self, target: usize) -> Pset {
        if target == 0 || self.points.len() <= target {
            return self.clone();
        }
        let stride = self.points.len() as f64 / target as f64;
        let points = (0..target)
            .map(|i| self.points[((i as f64 * stride) as usize).min(self.points.len() - 1)])
            .collect();
        Pset::new(points)
    }

    pub fn translated(&self, delta: [f64; 3]) -> Pset {
        Pset::new(self.points.iter().map(|p| p.translated(delta)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_is_median_nearest_distance_on_a_line() {
        let pset = Pset::from_coords([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [3.0, 0.0, 0.0]]);
        assert!((pset.step() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn medoid_of_symmetric_triangle_is_well_defined() {
        let pset = Pset::from_coords([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        assert!(pset.medoid().is_some());
    }

    #[test]
    fn downsample_respects_target_count() {
        let coords: Vec<[f64; 3]> = (0..100).map(|i| [i as f64, 0.0, 0.0]).collect();
        let pset = Pset::from_coords(coords);
        let down = pset.downsample(10);
        assert_eq!(down.len(), 10);
    }

    #[test]
    fn centroid_of_symmetric_points_is_origin() {
        let pset = Pset::from_coords([[1.0, 0.0, 0.0], [-1.0, 0.0, 0.0]]);
        let c = pset.centroid();
        assert!(c[0].abs() < 1e-9);
    }
}
