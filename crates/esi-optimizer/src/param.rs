//! Searched and fixed parameters, grouped.

use std::collections::HashMap;

/// Identifies the semantic role of a parameter to its owning domain (e.g.
/// "translation-x", "scale-z"). The optimizer itself never interprets
/// this value, only uses it as a key for `FixedParams` lookups and for
/// reporting — keeping the engine dimension-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamKind(pub u32);

/// One real-valued searched parameter.
///
/// Invariant: `min <= value <= max`, `steps >= 2`, `zoom` in `(0, 1)`.
#[derive(Debug, Clone, Copy)]
pub struct GoParam {
    pub kind: ParamKind,
    pub min: f64,
    pub max: f64,
    pub value: f64,
    pub steps: usize,
    pub sub_steps: usize,
    pub zoom: f64,
}

impl GoParam {
    pub fn new(
        kind: ParamKind,
        min: f64,
        max: f64,
        value: f64,
        steps: usize,
        sub_steps: usize,
        zoom: f64,
    ) -> Self {
        assert!(min <= value && value <= max, "value must lie within [min, max]");
        assert!(steps >= 2, "steps must be >= 2");
        assert!(zoom > 0.0 && zoom < 1.0, "zoom must lie in (0, 1)");
        Self {
            kind,
            min,
            max,
            value,
            steps,
            sub_steps,
            zoom,
        }
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Shrink `[min, max]` around `center`, keeping the same relative
    /// half-width scaled by `zoom`, and clamp `center` back inside.
    pub fn zoom_around(&mut self, center: f64) {
        let half = self.range() * 0.5 * self.zoom;
        let center = center.clamp(self.min, self.max);
        self.min = center - half;
        self.max = center + half;
        self.value = center;
    }
}

/// An ordered group of searched parameters plus a map of parameters that
/// are held fixed for the duration of this group's search.
///
/// Invariant: no kind in `fixed` also appears in `params`.
#[derive(Debug, Clone, Default)]
pub struct GoGroup {
    pub params: Vec<GoParam>,
    pub fixed: HashMap<ParamKind, f64>,
}

impl GoGroup {
    pub fn new(params: Vec<GoParam>) -> Self {
        Self {
            params,
            fixed: HashMap::new(),
        }
    }

    pub fn with_fixed(mut self, kind: ParamKind, value: f64) -> Self {
        assert!(
            !self.params.iter().any(|p| p.kind == kind),
            "kind {:?} cannot be both searched and fixed",
            kind
        );
        self.fixed.insert(kind, value);
        self
    }

    /// Current values of the searched parameters, in order.
    pub fn values(&self) -> Vec<f64> {
        self.params.iter().map(|p| p.value).collect()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic]
    fn value_outside_range_panics() {
        GoParam::new(ParamKind(0), 0.0, 1.0, 2.0, 4, 2, 0.5);
    }

    #[test]
    fn zoom_around_shrinks_range() {
        let mut p = GoParam::new(ParamKind(0), -10.0, 10.0, 0.0, 5, 2, 0.5);
        p.zoom_around(2.0);
        assert!((p.range() - 10.0).abs() < 1e-9);
        assert!(p.min < 2.0 && p.max > 2.0);
    }

    #[test]
    #[should_panic]
    fn fixed_and_searched_kind_conflict_panics() {
        let p = GoParam::new(ParamKind(1), 0.0, 1.0, 0.5, 4, 2, 0.5);
        GoGroup::new(vec![p]).with_fixed(ParamKind(1), 0.5);
    }
}
