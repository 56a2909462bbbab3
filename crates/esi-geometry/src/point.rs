//! A single spatial point plus its position in the original, unfiltered
//! sequence.

/// A real 3-vector tagged with the index it held in the point set it was
/// read from, so downsampling and rejection can still be related back to
/// the original ordering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub coords: [f64; 3],
    pub original_index: usize,
}

impl Point {
    pub fn new(coords: [f64; 3], original_index: usize) -> Self {
        Self {
            coords,
            original_index,
        }
    }

    pub fn x(&self) -> f64 {
        self.coords[0]
    }
    pub fn y(&self) -> f64 {
        self.coords[1]
    }
    pub fn z(&self) -> f64 {
        self.coords[2]
    }

    pub fn distance(&self, other: &Point) -> f64 {
        self.coords
            .iter()
            .zip(other.coords.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    pub fn translated(&self, delta: [f64; 3]) -> Point {
        Point::new(
            [
                self.coords[0] + delta[0],
                self.coords[1] + delta[1],
                self.coords[2] + delta[2],
            ],
            self.original_index,
        )
    }
}
