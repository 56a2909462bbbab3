//! Axis-aligned bounding box of a point set.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl BoundingBox {
    pub fn from_points<'a>(points: impl Iterator<Item = &'a [f64; 3]>) -> Self {
        let mut min = [f64::INFINITY; 3];
        let mut max = [f64::NEG_INFINITY; 3];
        for p in points {
            for d in 0..3 {
                min[d] = min[d].min(p[d]);
                max[d] = max[d].max(p[d]);
            }
        }
        Self { min, max }
    }

    pub fn center(&self) -> [f64; 3] {
        let mut c = [0.0; 3];
        for d in 0..3 {
            c[d] = 0.5 * (self.min[d] + self.max[d]);
        }
        c
    }

    /// Half-extent along one axis (0=x, 1=y, 2=z).
    pub fn radius_axis(&self, axis: usize) -> f64 {
        0.5 * (self.max[axis] - self.min[axis])
    }

    /// Characteristic overall radius: the mean of the three per-axis
    /// half-extents, used when a model scales isotropically.
    pub fn radius(&self) -> f64 {
        (self.radius_axis(0) + self.radius_axis(1) + self.radius_axis(2)) / 3.0
    }
}
