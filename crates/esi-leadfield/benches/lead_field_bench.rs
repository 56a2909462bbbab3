// Lead-field assembly benchmark - measure build_lead_field over a
// growing solution-point grid.
//
// Run with: cargo bench --bench lead_field_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use esi_geometry::{fit_head_surface_model, Pset};
use esi_leadfield::{build_lead_field, LeadFieldPreset};

fn cube_grid(n: usize, step: f64) -> Pset {
    let mut coords = Vec::with_capacity(n * n * n);
    for x in 0..n {
        for y in 0..n {
            for z in 0..n {
                coords.push([
                    (x as f64 - (n as f64) / 2.0) * step,
                    (y as f64 - (n as f64) / 2.0) * step,
                    (z as f64 - (n as f64) / 2.0) * step,
                ]);
            }
        }
    }
    Pset::from_coords(coords)
}

fn ring_electrodes(n: usize, radius: f64) -> Pset {
    let coords: Vec<[f64; 3]> = (0..n)
        .map(|i| {
            let theta = i as f64 / n as f64 * std::f64::consts::TAU;
            [radius * theta.cos(), radius * theta.sin(), radius * 0.2]
        })
        .collect();
    Pset::from_coords(coords)
}

fn sphere_points(n: usize, radius: f64) -> Pset {
    let coords: Vec<[f64; 3]> = (0..n)
        .map(|i| {
            let t = i as f64 / n as f64 * std::f64::consts::PI;
            let p = (i as f64 * 2.399963).fract() * std::f64::consts::TAU;
            [radius * t.sin() * p.cos(), radius * t.sin() * p.sin(), radius * t.cos()]
        })
        .collect();
    Pset::from_coords(coords)
}

fn bench_build_lead_field(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_lead_field");
    let electrodes = ring_electrodes(32, 10.0);
    let head_surface = sphere_points(256, 10.5);
    let (surface_model, fit_params) = fit_head_surface_model(&head_surface);
    let preset = LeadFieldPreset::default();

    for grid_n in [5usize, 8, 12] {
        let solution_points = cube_grid(grid_n, 1.5);
        group.bench_with_input(
            BenchmarkId::from_parameter(grid_n * grid_n * grid_n),
            &solution_points,
            |b, solution_points| {
                b.iter(|| {
                    let result = build_lead_field(
                        black_box(&preset),
                        black_box(&electrodes),
                        black_box(solution_points),
                        black_box(&surface_model),
                        black_box(&fit_params),
                    );
                    black_box(result.unwrap());
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_build_lead_field);
criterion_main!(benches);
