//! Scan-box search: full sub-step grid, binned down to the per-parameter
//! step resolution, argmin bin read off as the new point.

use crate::grid::{for_each_grid_point, sample_values};
use crate::param::GoParam;

/// Outcome of a single Box-Scan / Cross-Hair pass over a group of
/// searched parameters.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    /// New center value for each parameter, same order as the input slice.
    pub values: Vec<f64>,
    /// Cost at the returned point (Box-Scan: the winning bin's rescaled
    /// average; Cross-Hair: a fresh evaluation at the final point).
    pub best_value: f64,
    /// Standard deviation of every evaluation made during this pass,
    /// used as the value-space radius for the precision estimate.
    pub value_sd: f64,
}

fn mean_and_sd(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

/// Run one Box-Scan pass. `eval` is called with the full parameter vector
/// in the same order as `params`.
pub fn run(params: &[GoParam], eval: &dyn Fn(&[f64]) -> f64) -> StepOutcome {
    let m = params.len();
    if m == 0 {
        return StepOutcome {
            values: Vec::new(),
            best_value: eval(&[]),
            value_sd: 0.0,
        };
    }

    let samples: Vec<Vec<f64>> = params.iter().map(sample_values).collect();
    let dims: Vec<usize> = samples.iter().map(|s| s.len()).collect();
    let bin_counts: Vec<usize> = params.iter().map(|p| p.steps).collect();
    let bin_total: usize = bin_counts.iter().product();
    let sub_total: usize = params.iter().map(|p| p.sub_steps).product();

    let mut bin_sums = vec![0.0_f64; bin_total];
    let mut all_evals = Vec::with_capacity(dims.iter().product::<usize>().max(1));

    for_each_grid_point(&dims, |idx| {
        let point: Vec<f64> = idx.iter().zip(&samples).map(|(&i, s)| s[i]).collect();
        let value = eval(&point);
        all_evals.push(value);

        let mut bin_flat = 0usize;
        for p in 0..m {
            let bin_idx = idx[p] / params[p].sub_steps.max(1);
            bin_flat = bin_flat * bin_counts[p] + bin_idx;
        }
        bin_sums[bin_flat] += value;
    });

    let scale = 1.0 / sub_total.max(1) as f64;
    let mut best_flat = 0usize;
    let mut best_score = f64::INFINITY;
    for (i, &s) in bin_sums.iter().enumerate() {
        let scaled = s * scale;
        if scaled < best_score {
            best_score = scaled;
            best_flat = i;
        }
    }

    // un-flatten best_flat into per-parameter bin indices (row-major,
    // matching the accumulation order above).
    let mut bin_idx = vec![0usize; m];
    let mut rem = best_flat;
    for p in (0..m).rev() {
        bin_idx[p] = rem % bin_counts[p];
        rem /= bin_counts[p];
    }

    let values: Vec<f64> = (0..m)
        .map(|p| {
            let sub = params[p].sub_steps.max(1);
            let start = bin_idx[p] * sub;
            let slice = &samples[p][start..(start + sub).min(samples[p].len())];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect();

    let (_, sd) = mean_and_sd(&all_evals);

    StepOutcome {
        values,
        best_value: best_score,
        value_sd: sd,
    }
}
