// Inverse-operator build benchmark - measure build_operator across
// methods and solution-point counts.
//
// Run with: cargo bench --bench operator_build_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array2;

use esi_geometry::Pset;
use esi_inverse::{build_operator, InverseMethod, InverseMethodConfig};
use esi_solution_points::{NeighborhoodClass, NeighborhoodGraph, RejectedSet};

fn cube_grid(n: usize, step: f64) -> Pset {
    let mut coords = Vec::with_capacity(n * n * n);
    for x in 0..n {
        for y in 0..n {
            for z in 0..n {
                coords.push([x as f64 * step, y as f64 * step, z as f64 * step]);
            }
        }
    }
    Pset::from_coords(coords)
}

/// Deterministic, reasonably well-conditioned synthetic lead field: no
/// RNG dependency, just a smooth function of source/electrode indices.
fn synthetic_lead_field(num_sources: usize, num_electrodes: usize) -> Array2<f64> {
    Array2::from_shape_fn((num_sources * 3, num_electrodes), |(row, col)| {
        let source = (row / 3) as f64;
        let axis = (row % 3) as f64;
        let electrode = col as f64;
        ((source * 0.37 + axis * 1.1 + electrode * 0.53).sin() * 0.8 + 1.0)
            / (1.0 + (source - electrode).abs() * 0.05)
    })
}

fn bench_build_operator(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_operator");
    let num_electrodes = 32;

    for grid_n in [4usize, 6, 8] {
        let solution_points = cube_grid(grid_n, 1.5);
        let num_sources = solution_points.len();
        let k = synthetic_lead_field(num_sources, num_electrodes);
        let graph = NeighborhoodGraph::for_class(&solution_points, 1.5, NeighborhoodClass::Eighteen);
        let rejected = RejectedSet::new();
        let config = InverseMethodConfig { method: InverseMethod::Loreta, num_saved_regularizations: 8 };

        group.bench_with_input(BenchmarkId::from_parameter(num_sources), &k, |b, k| {
            b.iter(|| {
                let built = build_operator(
                    black_box(k),
                    black_box(&rejected),
                    black_box(&graph),
                    black_box(&solution_points),
                    black_box(&config),
                );
                black_box(built.unwrap());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build_operator);
criterion_main!(benches);
