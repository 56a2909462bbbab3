//! Minimal end-to-end run of the ESI pipeline on a synthetic scene: a
//! 26-electrode sphere, a 5x5x5 cube of candidate solution points, and a
//! coarse head surface, inverted with MN and sLORETA.
//!
//! Run with: cargo run --package esi-demo --bin minimal_run

use esi_core::EsiPipeline;
use esi_geometry::Pset;
use esi_inverse::{InverseMethod, InverseMethodConfig};
use esi_io::InverseFileReader;

fn cube_grid(n: usize, step: f64) -> Pset {
    let center = (n - 1) as f64 * step / 2.0;
    let mut coords = Vec::with_capacity(n * n * n);
    for x in 0..n {
        for y in 0..n {
            for z in 0..n {
                coords.push([x as f64 * step - center, y as f64 * step - center, z as f64 * step - center]);
            }
        }
    }
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

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let electrodes = sphere_points(26, 5.0);
    let solution_points = cube_grid(5, 1.0);
    let head_surface = sphere_points(512, 5.0);

    let pipeline = EsiPipeline {
        methods: vec![
            InverseMethodConfig { method: InverseMethod::Mn, num_saved_regularizations: 6 },
            InverseMethodConfig { method: InverseMethod::SLoreta, num_saved_regularizations: 6 },
        ],
        ..EsiPipeline::default()
    };

    let output_dir = tempfile::tempdir()?;
    let started = std::time::Instant::now();
    let report = pipeline.run(&electrodes, &solution_points, &head_surface, output_dir.path(), None)?;
    let elapsed = started.elapsed();

    println!("ESI pipeline run complete in {elapsed:?}");
    println!("  electrodes:       {}", electrodes.len());
    println!("  solution points:  {}", solution_points.len());
    println!("  rejected points:  {}", report.rejected_points.len());
    println!();

    for (method, lambda_max) in &report.lambda_max {
        println!("  {:<8} lambda_max = {:.6}", method.name(), lambda_max);
    }
    println!();

    for path in &report.files_written {
        let mut reader = InverseFileReader::open(path)?;
        println!(
            "  wrote {:?} (numel={}, numsolp={}, numreg={})",
            path.file_name().unwrap(),
            reader.header.numel,
            reader.header.numsolp,
            reader.header.numreg,
        );
        let first = reader.read_matrix(0)?;
        println!("    first matrix shape: {:?}", first.dim());
    }

    Ok(())
}
