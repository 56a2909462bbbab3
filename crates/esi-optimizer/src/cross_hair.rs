//! Cross-Hair search: sweep each axis independently while holding the
//! others at their current (already-updated) value.

use crate::box_scan::StepOutcome;
use crate::grid::sample_values;
use crate::param::GoParam;

fn mean_and_sd(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

/// Run one Cross-Hair pass. A subtle, deliberate difference from
/// Box-Scan: the reported `best_value` is a fresh evaluation at the
/// final point, not an average of the sweep.
pub fn run(params: &[GoParam], eval: &dyn Fn(&[f64]) -> f64) -> StepOutcome {
    let m = params.len();
    let mut current: Vec<f64> = params.iter().map(|p| p.value).collect();
    let mut all_evals = Vec::new();

    for p in 0..m {
        let samples = sample_values(&params[p]);
        let sub = params[p].sub_steps.max(1);
        let bins = params[p].steps;

        let mut bin_means = vec![0.0_f64; bins];
        for b in 0..bins {
            let start = b * sub;
            let end = (start + sub).min(samples.len());
            let mut sum = 0.0;
            let mut count = 0usize;
            for &s in &samples[start..end] {
                let mut trial = current.clone();
                trial[p] = s;
                let v = eval(&trial);
                all_evals.push(v);
                sum += v;
                count += 1;
            }
            bin_means[b] = if count > 0 { sum / count as f64 } else { f64::INFINITY };
        }

        let (best_bin, _) = bin_means
            .iter()
            .enumerate()
            .fold((0usize, f64::INFINITY), |(bi, bv), (i, &v)| {
                if v < bv {
                    (i, v)
                } else {
                    (bi, bv)
                }
            });

        let start = best_bin * sub;
        let end = (start + sub).min(samples.len());
        let slice = &samples[start..end];
        current[p] = slice.iter().sum::<f64>() / slice.len() as f64;
    }

    let final_value = eval(&current);
    let (_, sd) = mean_and_sd(&all_evals);

    StepOutcome {
        values: current,
        best_value: final_value,
        value_sd: sd,
    }
}
