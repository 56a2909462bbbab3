//! Pipeline orchestration for the EEG source imaging core: wires
//! geometry fusion, lead-field assembly, solution-point graph
//! construction, inverse-operator builders and the on-disk writer into a
//! single `EsiPipeline::run` entry point.

pub mod context;
pub mod error;
pub mod pipeline;

pub use context::ExecutionMode;
pub use error::PipelineError;
pub use pipeline::{EsiPipeline, PipelineReport, ResolutionTargets};

#[cfg(test)]
mod tests {
    use super::*;
    use esi_geometry::Pset;
    use esi_inverse::{InverseMethod, InverseMethodConfig};
    use esi_solution_points::NeighborhoodClass;

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

    #[test]
    fn end_to_end_run_on_a_small_cube_writes_one_file_per_method() {
        let electrodes = ring_electrodes(16, 10.0);
        let solution_points = cube_grid(4, 1.5);
        let head_surface = sphere_points(256, 10.5);

        let pipeline = EsiPipeline {
            methods: vec![
                InverseMethodConfig { method: InverseMethod::Mn, num_saved_regularizations: 2 },
                InverseMethodConfig { method: InverseMethod::Wmn, num_saved_regularizations: 2 },
            ],
            neighborhood_class: NeighborhoodClass::Six,
            ..EsiPipeline::default()
        };

        let dir = tempfile::tempdir().unwrap();
        let report = pipeline.run(&electrodes, &solution_points, &head_surface, dir.path(), None).unwrap();

        assert_eq!(report.files_written.len(), 2);
        assert_eq!(report.lambda_max.len(), 2);
        for path in &report.files_written {
            assert!(path.exists());
        }
    }

    #[test]
    fn rejects_no_methods_configured() {
        let electrodes = ring_electrodes(8, 10.0);
        let solution_points = cube_grid(3, 1.5);
        let head_surface = sphere_points(128, 10.5);
        let pipeline = EsiPipeline { methods: vec![], ..EsiPipeline::default() };
        let dir = tempfile::tempdir().unwrap();
        let result = pipeline.run(&electrodes, &solution_points, &head_surface, dir.path(), None);
        assert!(result.is_err());
    }
}
