//! Top-level driver: wires a set of [`GoGroup`]s, a [`CostFn`], a
//! [`SearchMethod`] and a [`Strategy`] together into an iterative
//! refine-and-zoom loop.

use crate::box_scan;
use crate::cost::CostFn;
use crate::cross_hair;
use crate::nelder_mead::Simplex;
use crate::param::{GoGroup, GoParam, ParamKind};
use crate::precision::PrecisionTracker;
use crate::strategy::Strategy;

/// Which per-group search routine is used to refine a group's
/// parameters on a single visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMethod {
    BoxScan,
    CrossHair,
    NelderMead,
}

/// Hard cap on outer-loop iterations when the caller doesn't want to
/// pick their own. `Optimizer::run` still accepts an explicit cap so
/// callers (and tests) can bound the work directly.
pub const DEFAULT_MAX_ITERATIONS: usize = 2000;

/// Final state returned by [`Optimizer::run`].
#[derive(Debug, Clone)]
pub struct OptimizerResult {
    /// Every group's final searched-parameter values, in the same order
    /// the groups were supplied.
    pub groups: Vec<Vec<f64>>,
    pub best_value: f64,
    /// The combined precision reading when the loop stopped: `<=` the
    /// requested precision if convergence was reached before the
    /// iteration cap, otherwise whatever it got down to.
    pub precision: f64,
}

/// Builds the full `(kind, value)` snapshot a [`CostFn`] expects: every
/// group's current searched values (with `which`'s replaced by `trial`,
/// if given), plus every group's fixed parameters.
fn snapshot(
    groups: &[GoGroup],
    which: Option<usize>,
    trial: Option<&[f64]>,
) -> Vec<(ParamKind, f64)> {
    let mut out = Vec::new();
    for (gi, g) in groups.iter().enumerate() {
        if Some(gi) == which {
            let trial = trial.expect("trial values required for the replaced group");
            for (p, &v) in g.params.iter().zip(trial) {
                out.push((p.kind, v));
            }
        } else {
            for p in &g.params {
                out.push((p.kind, p.value));
            }
        }
        for (&k, &v) in &g.fixed {
            out.push((k, v));
        }
    }
    out
}

/// Number of simplex refine steps run per Nelder-Mead visit: scales
/// with dimensionality, with a floor so single-parameter groups still
/// get a reasonable number of reflect/expand/contract cycles.
fn nelder_mead_steps(n: usize) -> usize {
    n * 20 + 20
}

pub struct Optimizer<C: CostFn> {
    groups: Vec<GoGroup>,
    method: SearchMethod,
    strategy: Strategy,
    cost: C,
    trackers: Vec<PrecisionTracker>,
    /// Last known Nelder-Mead simplex radius per group; only meaningful
    /// (and only updated) when `method == NelderMead`.
    group_simplex_radius: Vec<f64>,
    /// Same idea as `group_simplex_radius`, but for the single pooled
    /// simplex `Strategy::Global` runs over every group's flattened
    /// parameters.
    global_simplex_radius: f64,
    /// Smoothed combined precision, per the outer-loop convergence
    /// criterion: starts at 1.0 and only ever decreases.
    precision: f64,
    /// Iteration-0 (parameter-radius, value-radius) readings, used to
    /// normalize every later iteration's readings.
    radius0: Option<(f64, f64)>,
}

impl<C: CostFn> Optimizer<C> {
    pub fn new(groups: Vec<GoGroup>, method: SearchMethod, strategy: Strategy, cost: C) -> Self {
        assert!(
            strategy != Strategy::WeakestDimension || method != SearchMethod::NelderMead,
            "Weakest-Dimension traversal only supports Box-Scan and Cross-Hair"
        );

        let trackers = groups.iter().map(|_| PrecisionTracker::new(0.4)).collect();
        let group_simplex_radius = groups
            .iter()
            .map(|g| if g.is_empty() { 0.0 } else { Simplex::initialize(&g.params).radius() })
            .collect();
        let all_params: Vec<GoParam> = groups.iter().flat_map(|g| g.params.iter().copied()).collect();
        let global_simplex_radius =
            if all_params.is_empty() { 0.0 } else { Simplex::initialize(&all_params).radius() };

        Self {
            groups,
            method,
            strategy,
            cost,
            trackers,
            group_simplex_radius,
            global_simplex_radius,
            precision: 1.0,
            radius0: None,
        }
    }

    fn eval_group(&self, which: usize, trial: &[f64]) -> f64 {
        let params = snapshot(&self.groups, Some(which), Some(trial));
        self.cost.evaluate(&params)
    }

    /// Refine a single group by one pass of the configured search
    /// method, apply the zoom, and record its shrunk range in the
    /// precision tracker. Returns the pass's best value and the
    /// standard deviation of every evaluation made during the pass.
    fn refine_group(&mut self, gi: usize) -> (f64, f64) {
        let group = self.groups[gi].clone();
        if group.is_empty() {
            let value = self.cost.evaluate(&snapshot(&self.groups, None, None));
            return (value, 0.0);
        }

        let eval = |x: &[f64]| self.eval_group(gi, x);
        let (values, best_value, value_sd) = match self.method {
            SearchMethod::BoxScan => {
                let out = box_scan::run(&group.params, &eval);
                (out.values, out.best_value, out.value_sd)
            }
            SearchMethod::CrossHair => {
                let out = cross_hair::run(&group.params, &eval);
                (out.values, out.best_value, out.value_sd)
            }
            SearchMethod::NelderMead => {
                let mut simplex = Simplex::initialize(&group.params);
                simplex.refresh(&eval);
                for _ in 0..nelder_mead_steps(group.params.len()) {
                    simplex.step(&eval);
                }
                self.group_simplex_radius[gi] = simplex.radius();
                (simplex.best_point().to_vec(), simplex.best_value(), simplex.value_sd())
            }
        };

        let group = &mut self.groups[gi];
        for (p, &v) in group.params.iter_mut().zip(&values) {
            p.zoom_around(v);
        }
        let range: f64 = group.params.iter().map(|p| p.range()).sum();
        self.trackers[gi].update(range);

        (best_value, value_sd)
    }

    fn weakest_group(&self) -> usize {
        (0..self.groups.len())
            .filter(|&gi| !self.groups[gi].is_empty())
            .max_by(|&a, &b| {
                self.trackers[a]
                    .value()
                    .partial_cmp(&self.trackers[b].value())
                    .unwrap()
            })
            .unwrap_or(0)
    }

    /// Current parameter-space radius: the square root of the sum of
    /// squared per-group contributions. Box-Scan/Cross-Hair read this
    /// straight off each parameter's live `[min, max]` (already shrunk
    /// by `zoom_around`); Nelder-Mead instead reads the simplex's own
    /// radius from its most recent pass, since the group's nominal
    /// range shrinks geometrically regardless of how converged the
    /// simplex actually is.
    fn current_param_radius(&self) -> f64 {
        match (self.strategy, self.method) {
            (Strategy::Global, SearchMethod::NelderMead) => self.global_simplex_radius,
            (_, SearchMethod::NelderMead) => {
                self.group_simplex_radius.iter().map(|r| r * r).sum::<f64>().sqrt()
            }
            _ => self
                .groups
                .iter()
                .flat_map(|g| g.params.iter())
                .map(|p| (p.range() * 0.5).powi(2))
                .sum::<f64>()
                .sqrt(),
        }
    }

    /// Run the outer loop until the combined precision reaches
    /// `requested_precision` or `max_iterations` passes have run,
    /// whichever comes first.
    pub fn run(&mut self, max_iterations: usize, requested_precision: f64) -> OptimizerResult {
        let mut best_value = f64::INFINITY;

        for iteration in 0..max_iterations {
            tracing::trace!(iteration, strategy = ?self.strategy, "optimizer iteration");
            let mut iteration_value_sd = 0.0;

            match self.strategy {
                Strategy::Global => {
                    let flattened: Vec<_> = self
                        .groups
                        .iter()
                        .enumerate()
                        .flat_map(|(gi, g)| g.params.iter().map(move |p| (gi, *p)))
                        .collect();
                    if flattened.is_empty() {
                        continue;
                    }
                    let params: Vec<GoParam> = flattened.iter().map(|(_, p)| *p).collect();
                    let eval = |x: &[f64]| {
                        let mut snap = Vec::new();
                        for (gi, g) in self.groups.iter().enumerate() {
                            for p in &g.params {
                                let flat_idx = flattened
                                    .iter()
                                    .position(|(fgi, fp)| *fgi == gi && fp.kind == p.kind)
                                    .unwrap();
                                snap.push((p.kind, x[flat_idx]));
                            }
                            for (&k, &v) in &g.fixed {
                                snap.push((k, v));
                            }
                        }
                        self.cost.evaluate(&snap)
                    };

                    let (values, value_best, value_sd, simplex_radius) = match self.method {
                        SearchMethod::BoxScan => {
                            let out = box_scan::run(&params, &eval);
                            (out.values, out.best_value, out.value_sd, None)
                        }
                        SearchMethod::CrossHair => {
                            let out = cross_hair::run(&params, &eval);
                            (out.values, out.best_value, out.value_sd, None)
                        }
                        SearchMethod::NelderMead => {
                            let mut simplex = Simplex::initialize(&params);
                            simplex.refresh(&eval);
                            for _ in 0..nelder_mead_steps(params.len()) {
                                simplex.step(&eval);
                            }
                            (
                                simplex.best_point().to_vec(),
                                simplex.best_value(),
                                simplex.value_sd(),
                                Some(simplex.radius()),
                            )
                        }
                    };
                    best_value = value_best;
                    iteration_value_sd = value_sd;
                    if let Some(r) = simplex_radius {
                        self.global_simplex_radius = r;
                    }

                    for (idx, (gi, _)) in flattened.iter().enumerate() {
                        let v = values[idx];
                        let kind = flattened[idx].1.kind;
                        if let Some(p) = self.groups[*gi]
                            .params
                            .iter_mut()
                            .find(|p| p.kind == kind)
                        {
                            p.zoom_around(v);
                        }
                    }
                    for gi in 0..self.groups.len() {
                        let range: f64 = self.groups[gi].params.iter().map(|p| p.range()).sum();
                        self.trackers[gi].update(range);
                    }
                }
                Strategy::Cyclical => {
                    let mut sd_sq_sum = 0.0;
                    let mut sd_count = 0usize;
                    for gi in 0..self.groups.len() {
                        if self.groups[gi].is_empty() {
                            continue;
                        }
                        let (bv, sd) = self.refine_group(gi);
                        best_value = bv;
                        sd_sq_sum += sd * sd;
                        sd_count += 1;
                    }
                    iteration_value_sd = if sd_count > 0 { (sd_sq_sum / sd_count as f64).sqrt() } else { 0.0 };
                }
                Strategy::WeakestGroup => {
                    let gi = self.weakest_group();
                    let (bv, sd) = self.refine_group(gi);
                    best_value = bv;
                    iteration_value_sd = sd;
                }
                Strategy::WeakestDimension => {
                    // Degrades to per-parameter groups of one: find the
                    // single searched parameter with the largest current
                    // range across every group and refine only it,
                    // holding every other parameter (searched or fixed)
                    // at its current value.
                    let mut worst: Option<(usize, usize, f64)> = None;
                    for (gi, g) in self.groups.iter().enumerate() {
                        for (pi, p) in g.params.iter().enumerate() {
                            if worst.map(|(_, _, r)| p.range() > r).unwrap_or(true) {
                                worst = Some((gi, pi, p.range()));
                            }
                        }
                    }
                    let Some((gi, pi, _)) = worst else {
                        continue;
                    };
                    let solo = self.groups[gi].params[pi];
                    let eval = |x: &[f64]| {
                        let mut trial = self.groups[gi].values();
                        trial[pi] = x[0];
                        self.eval_group(gi, &trial)
                    };
                    let out = match self.method {
                        SearchMethod::BoxScan => box_scan::run(&[solo], &eval),
                        SearchMethod::CrossHair => cross_hair::run(&[solo], &eval),
                        SearchMethod::NelderMead => {
                            unreachable!("Weakest-Dimension traversal only supports Box-Scan and Cross-Hair")
                        }
                    };
                    best_value = out.best_value;
                    iteration_value_sd = out.value_sd;
                    self.groups[gi].params[pi].zoom_around(out.values[0]);
                    let range: f64 = self.groups[gi].params.iter().map(|p| p.range()).sum();
                    self.trackers[gi].update(range);
                }
            }

            let rp = self.current_param_radius();
            let rv = iteration_value_sd.sqrt();
            let (rp0, rv0) = *self.radius0.get_or_insert((rp.max(f64::EPSILON), rv.max(f64::EPSILON)));
            let rp_norm = (rp / rp0).min(1.0);
            let rv_norm = (rv / rv0).min(1.0);
            let reading = rp_norm.min(rv_norm);
            self.precision = (0.9 * self.precision + 0.1 * reading).min(self.precision).clamp(0.0, 1.0);

            tracing::trace!(iteration, precision = self.precision, "precision updated");

            if self.precision <= requested_precision {
                tracing::debug!(iteration, precision = self.precision, "requested precision reached");
                break;
            }
        }

        tracing::debug!(best_value, precision = self.precision, "optimizer run complete");
        OptimizerResult {
            groups: self.groups.iter().map(|g| g.values()).collect(),
            best_value,
            precision: self.precision,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::{GoParam, ParamKind};

    #[test]
    fn cyclical_box_scan_converges_on_two_independent_groups() {
        let gx = GoGroup::new(vec![GoParam::new(ParamKind(0), -5.0, 5.0, 0.0, 5, 3, 0.6)]);
        let gy = GoGroup::new(vec![GoParam::new(ParamKind(1), -5.0, 5.0, 0.0, 5, 3, 0.6)]);

        let cost = |params: &[(ParamKind, f64)]| {
            let x = params.iter().find(|(k, _)| *k == ParamKind(0)).unwrap().1;
            let y = params.iter().find(|(k, _)| *k == ParamKind(1)).unwrap().1;
            (x - 1.3).powi(2) + 2.0 * (y + 0.7).powi(2)
        };

        let mut opt = Optimizer::new(
            vec![gx, gy],
            SearchMethod::BoxScan,
            Strategy::Cyclical,
            cost,
        );
        let result = opt.run(20, 1e-4);

        assert!((result.groups[0][0] - 1.3).abs() < 0.2);
        assert!((result.groups[1][0] + 0.7).abs() < 0.2);
    }

    #[test]
    fn weakest_group_refines_the_least_converged_group_first() {
        let gx = GoGroup::new(vec![GoParam::new(ParamKind(0), -5.0, 5.0, 0.0, 5, 3, 0.6)]);
        let gy = GoGroup::new(vec![GoParam::new(ParamKind(1), -5.0, 5.0, 0.0, 5, 5, 0.6)]);

        let cost = |params: &[(ParamKind, f64)]| {
            let x = params.iter().find(|(k, _)| *k == ParamKind(0)).unwrap().1;
            let y = params.iter().find(|(k, _)| *k == ParamKind(1)).unwrap().1;
            (x - 1.0).powi(2) + (y - 1.0).powi(2)
        };

        let mut opt = Optimizer::new(
            vec![gx, gy],
            SearchMethod::BoxScan,
            Strategy::WeakestGroup,
            cost,
        );
        let result = opt.run(10, 1e-4);
        assert!(result.best_value.is_finite());
    }

    #[test]
    #[should_panic]
    fn weakest_dimension_rejects_nelder_mead() {
        let gx = GoGroup::new(vec![GoParam::new(ParamKind(0), -5.0, 5.0, 0.0, 5, 3, 0.6)]);
        let cost = |_: &[(ParamKind, f64)]| 0.0;
        Optimizer::new(vec![gx], SearchMethod::NelderMead, Strategy::WeakestDimension, cost);
    }
}
