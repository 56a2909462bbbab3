//! Nelder-Mead simplex search with reflect/expand/contract/shrink
//! coefficients (1.50, 2.75, 0.75, 0.60).

use crate::box_scan::StepOutcome;
use crate::param::GoParam;

const REFLECT: f64 = 1.50;
const EXPAND: f64 = 2.75;
const CONTRACT: f64 = 0.75;
const SHRINK: f64 = 0.60;

/// `n+1` vertices in `R^n`, one value per vertex.
///
/// Invariant: `values` is always up to date with `vertices` before any
/// reflect/expand/contract decision; the centroid excludes the worst
/// vertex.
#[derive(Debug, Clone)]
pub struct Simplex {
    pub vertices: Vec<Vec<f64>>,
    pub values: Vec<f64>,
}

impl Simplex {
    /// Vertex 0 is every parameter's mid-point; vertex `i` (1-indexed) is
    /// the mid-point simplex with component `i-1` replaced by that
    /// parameter's max.
    pub fn initialize(params: &[GoParam]) -> Self {
        let n = params.len();
        let mid: Vec<f64> = params.iter().map(|p| 0.5 * (p.min + p.max)).collect();

        let mut vertices = Vec::with_capacity(n + 1);
        vertices.push(mid.clone());
        for i in 0..n {
            let mut v = mid.clone();
            v[i] = params[i].max;
            vertices.push(v);
        }

        Self {
            vertices,
            values: vec![f64::INFINITY; n + 1],
        }
    }

    pub fn refresh(&mut self, eval: &dyn Fn(&[f64]) -> f64) {
        for (v, val) in self.vertices.iter().zip(self.values.iter_mut()) {
            *val = eval(v);
        }
    }

    fn order(&self) -> Vec<usize> {
        let mut idx: Vec<usize> = (0..self.values.len()).collect();
        idx.sort_by(|&a, &b| self.values[a].partial_cmp(&self.values[b]).unwrap());
        idx
    }

    fn centroid_excluding(&self, exclude: usize) -> Vec<f64> {
        let n = self.vertices[0].len();
        let mut c = vec![0.0; n];
        let mut count = 0;
        for (i, v) in self.vertices.iter().enumerate() {
            if i == exclude {
                continue;
            }
            for d in 0..n {
                c[d] += v[d];
            }
            count += 1;
        }
        for d in 0..n {
            c[d] /= count as f64;
        }
        c
    }

    fn combine(a: &[f64], b: &[f64], coeff: f64) -> Vec<f64> {
        a.iter()
            .zip(b.iter())
            .map(|(&ai, &bi)| ai + coeff * (ai - bi))
            .collect()
    }

    /// Radius of the simplex: the maximum distance from the centroid of
    /// all vertices to any single vertex.
    pub fn radius(&self) -> f64 {
        let n = self.vertices[0].len();
        let mut c = vec![0.0; n];
        for v in &self.vertices {
            for d in 0..n {
                c[d] += v[d];
            }
        }
        for d in 0..n {
            c[d] /= self.vertices.len() as f64;
        }
        self.vertices
            .iter()
            .map(|v| {
                v.iter()
                    .zip(c.iter())
                    .map(|(a, b)| (a - b).powi(2))
                    .sum::<f64>()
                    .sqrt()
            })
            .fold(0.0, f64::max)
    }

    pub fn value_sd(&self) -> f64 {
        let n = self.values.len() as f64;
        let mean = self.values.iter().sum::<f64>() / n;
        (self.values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt()
    }

    pub fn best_point(&self) -> &[f64] {
        let idx = self.order()[0];
        &self.vertices[idx]
    }

    pub fn best_value(&self) -> f64 {
        self.values.iter().cloned().fold(f64::INFINITY, f64::min)
    }

    /// One reflect/expand/contract/shrink cycle.
    pub fn step(&mut self, eval: &dyn Fn(&[f64]) -> f64) -> StepOutcome {
        let order = self.order();
        let worst = *order.last().unwrap();
        let second_worst = order[order.len() - 2];
        let best = order[0];

        let centroid = self.centroid_excluding(worst);
        let worst_point = self.vertices[worst].clone();

        let reflected = Self::combine(&centroid, &worst_point, REFLECT);
        let f_reflected = eval(&reflected);

        if f_reflected < self.values[best] {
            let expanded = Self::combine(&centroid, &worst_point, EXPAND);
            let f_expanded = eval(&expanded);
            if f_expanded < f_reflected {
                self.vertices[worst] = expanded;
                self.values[worst] = f_expanded;
            } else {
                self.vertices[worst] = reflected;
                self.values[worst] = f_reflected;
            }
        } else if f_reflected < self.values[second_worst] {
            self.vertices[worst] = reflected;
            self.values[worst] = f_reflected;
        } else {
            let contracted = Self::combine(&centroid, &worst_point, -CONTRACT);
            let f_contracted = eval(&contracted);
            if f_contracted < self.values[worst] {
                self.vertices[worst] = contracted;
                self.values[worst] = f_contracted;
            } else {
                let best_point = self.vertices[best].clone();
                for (i, v) in self.vertices.iter_mut().enumerate() {
                    if i == best {
                        continue;
                    }
                    for d in 0..v.len() {
                        v[d] = best_point[d] + SHRINK * (v[d] - best_point[d]);
                    }
                    self.values[i] = eval(v);
                }
            }
        }

        StepOutcome {
            values: self.best_point().to_vec(),
            best_value: self.best_value(),
            value_sd: self.value_sd(),
        }
    }
}
