use esi_core::EsiPipeline;
use esi_geometry::Pset;
use esi_inverse::{InverseMethod, InverseMethodConfig};
use esi_io::InverseFileReader;

fn cube_grid(n: usize, step: f64, center: f64) -> Pset {
    let mut coords = Vec::with_capacity(n * n * n);
    for x in 0..n {
        for y in 0..n {
            for z in 0..n {
                coords.push([
                    x as f64 * step - center,
                    y as f64 * step - center,
                    z as f64 * step - center,
                ]);
            }
        }
    }
    Pset::from_coords(coords)
}

fn sphere_electrodes(n: usize, radius: f64) -> Pset {
    let coords: Vec<[f64; 3]> = (0..n)
        .map(|i| {
            let t = i as f64 / n as f64 * std::f64::consts::PI;
            let p = (i as f64 * 2.399963).fract() * std::f64::consts::TAU;
            [radius * t.sin() * p.cos(), radius * t.sin() * p.sin(), radius * t.cos()]
        })
        .collect();
    Pset::from_coords(coords)
}

/// Solution points on a 5x5x5 grid (step 1), 26 electrodes on a sphere
/// of radius 5, the default 3-shell preset (5.0/4.6/4.2, conductivities
/// 0.33/0.016/0.33), MN with four regularization levels.
#[test]
fn cube_grid_mn_writes_a_header_matching_the_expected_dimensions() {
    let solution_points = cube_grid(5, 1.0, 2.0);
    let electrodes = sphere_electrodes(26, 5.0);
    let head_surface = sphere_electrodes(512, 5.0);

    let pipeline = EsiPipeline {
        methods: vec![InverseMethodConfig { method: InverseMethod::Mn, num_saved_regularizations: 4 }],
        ..EsiPipeline::default()
    };

    let dir = tempfile::tempdir().unwrap();
    let report = pipeline.run(&electrodes, &solution_points, &head_surface, dir.path(), None).unwrap();
    assert_eq!(report.files_written.len(), 1);

    let mut reader = InverseFileReader::open(&report.files_written[0]).unwrap();
    assert_eq!(reader.header.numel, 26);
    assert_eq!(reader.header.numsolp, 125);
    assert_eq!(reader.header.numreg, 4);
    assert_eq!(reader.header.invscal, 0);

    let expected_body_bytes = 4 * (125 * 3) * 26 * 4;
    let file_len = std::fs::metadata(&report.files_written[0]).unwrap().len() as usize;
    let header_and_tables_bytes = file_len - expected_body_bytes;
    assert!(header_and_tables_bytes > 0, "body did not fit the expected scenario size");

    for r in 0..4 {
        let matrix = reader.read_matrix(r).unwrap();
        assert_eq!(matrix.dim(), (375, 26));
        assert!(matrix.iter().all(|v| v.is_finite()));
    }
}

#[test]
fn rejects_no_methods_configured_before_touching_disk() {
    let solution_points = cube_grid(3, 1.0, 1.0);
    let electrodes = sphere_electrodes(16, 5.0);
    let head_surface = sphere_electrodes(256, 5.0);

    let pipeline = EsiPipeline { methods: vec![], ..EsiPipeline::default() };
    let dir = tempfile::tempdir().unwrap();
    let result = pipeline.run(&electrodes, &solution_points, &head_surface, dir.path(), None);
    assert!(result.is_err());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
