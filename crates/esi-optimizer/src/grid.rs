//! Shared odometer-style cartesian product iteration over a group's
//! sub-step grid, used by both Box-Scan and Cross-Hair.

use crate::param::GoParam;

/// The `steps * sub_steps` evenly spaced sample values for one parameter.
pub fn sample_values(p: &GoParam) -> Vec<f64> {
    let total = p.steps * p.sub_steps;
    if total <= 1 {
        return vec![p.value];
    }
    (0..total)
        .map(|i| p.min + (p.max - p.min) * i as f64 / (total - 1) as f64)
        .collect()
}

/// Iterate every combination of per-parameter sample indices, odometer
/// style (last parameter varies fastest). Calls `visit(indices)` for each
/// combination.
pub fn for_each_grid_point(dims: &[usize], mut visit: impl FnMut(&[usize])) {
    if dims.is_empty() {
        return;
    }
    let mut idx = vec![0usize; dims.len()];
    loop {
        visit(&idx);

        let mut carry = dims.len();
        while carry > 0 {
            carry -= 1;
            idx[carry] += 1;
            if idx[carry] < dims[carry] {
                break;
            }
            idx[carry] = 0;
            if carry == 0 {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerates_full_cartesian_product() {
        let dims = [2, 3];
        let mut seen = Vec::new();
        for_each_grid_point(&dims, |idx| seen.push(idx.to_vec()));
        assert_eq!(seen.len(), 6);
        assert!(seen.contains(&vec![0, 0]));
        assert!(seen.contains(&vec![1, 2]));
    }

    #[test]
    fn sample_values_spans_min_to_max() {
        let p = GoParam::new(crate::param::ParamKind(0), -1.0, 1.0, 0.0, 5, 1, 0.5);
        let v = sample_values(&p);
        assert_eq!(v.len(), 5);
        assert!((v[0] - (-1.0)).abs() < 1e-9);
        assert!((v[4] - 1.0).abs() < 1e-9);
    }
}
