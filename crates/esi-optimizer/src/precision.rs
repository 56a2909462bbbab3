//! Smoothed precision tracking: an exponentially-weighted estimate of
//! how much a group's (or dimension's) range has shrunk, used by the
//! Weakest-Group and Weakest-Dimension strategies to pick what to
//! refine next, and by the caller to decide when to stop.

/// Exponential moving average over successive range/radius readings.
/// A high value means this track still has a lot of range left to
/// resolve; a low value means it has converged.
#[derive(Debug, Clone, Copy)]
pub struct PrecisionTracker {
    smoothed: Option<f64>,
    alpha: f64,
}

impl PrecisionTracker {
    pub fn new(alpha: f64) -> Self {
        assert!(alpha > 0.0 && alpha <= 1.0, "alpha must lie in (0, 1]");
        Self {
            smoothed: None,
            alpha,
        }
    }

    /// Fold in a new range/radius reading, returning the updated
    /// smoothed value.
    pub fn update(&mut self, reading: f64) -> f64 {
        let next = match self.smoothed {
            None => reading,
            Some(prev) => self.alpha * reading + (1.0 - self.alpha) * prev,
        };
        self.smoothed = Some(next);
        next
    }

    pub fn value(&self) -> f64 {
        self.smoothed.unwrap_or(f64::INFINITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_reading_is_taken_verbatim() {
        let mut t = PrecisionTracker::new(0.3);
        assert_eq!(t.update(10.0), 10.0);
    }

    #[test]
    fn smooths_towards_small_readings() {
        let mut t = PrecisionTracker::new(0.5);
        t.update(10.0);
        let second = t.update(2.0);
        assert!((second - 6.0).abs() < 1e-9);
        assert!(t.value() < 10.0);
    }
}
