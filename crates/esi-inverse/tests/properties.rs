use ndarray::Array2;

use esi_geometry::Pset;
use esi_inverse::{build_operator, InverseMethod, InverseMethodConfig};
use esi_solution_points::{NeighborhoodClass, NeighborhoodGraph, RejectedSet};

fn synthetic_lead_field(num_sources: usize, num_electrodes: usize) -> Array2<f64> {
    Array2::from_shape_fn((num_sources * 3, num_electrodes), |(row, col)| {
        let source = (row / 3) as f64;
        let axis = (row % 3) as f64;
        let electrode = col as f64;
        ((source * 0.37 + axis * 1.1 + electrode * 0.53).sin() * 0.8 + 1.0)
            / (1.0 + (source - electrode).abs() * 0.05)
    })
}

fn chain_points(n: usize) -> Pset {
    Pset::from_coords((0..n).map(|i| [i as f64, 0.0, 0.0]))
}

/// For K of full column rank (our convention; full row rank of the
/// textbook Nelec x Ns3 form) and no regularization, K^T J_MN = I_Nelec.
#[test]
fn mn_recovers_the_electrode_identity_at_zero_regularization() {
    let k = synthetic_lead_field(4, 3);
    let points = chain_points(4);
    let graph = NeighborhoodGraph::for_class(&points, 1.0, NeighborhoodClass::Six);
    let rejected = RejectedSet::new();
    let config = InverseMethodConfig { method: InverseMethod::Mn, num_saved_regularizations: 3 };

    let built = build_operator(&k, &rejected, &graph, &points, &config).unwrap();
    let recovered = k.t().dot(&built.matrices[0]);

    for i in 0..3 {
        for j in 0..3 {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert!(
                (recovered[[i, j]] - expected).abs() < 1e-4,
                "recovered[{i},{j}] = {} not within 1e-4 of {expected}",
                recovered[[i, j]]
            );
        }
    }
}

/// For each source, the standardized 3x3 block has trace ~3 and small
/// off-diagonal, in the noiseless (r=0) limit.
#[test]
fn sloreta_standardizes_each_source_block_to_near_identity_trace() {
    let k = synthetic_lead_field(3, 6);
    let points = chain_points(3);
    let graph = NeighborhoodGraph::for_class(&points, 1.0, NeighborhoodClass::Six);
    let rejected = RejectedSet::new();
    let config = InverseMethodConfig { method: InverseMethod::SLoreta, num_saved_regularizations: 2 };

    let built = build_operator(&k, &rejected, &graph, &points, &config).unwrap();
    let j = &built.matrices[0];

    for i in 0..3 {
        let j_block = j.slice(ndarray::s![i * 3..i * 3 + 3, ..]);
        let k_block = k.slice(ndarray::s![i * 3..i * 3 + 3, ..]);
        let product = j_block.dot(&k_block.t());

        let trace: f64 = (0..3).map(|d| product[[d, d]]).sum();
        assert!((trace - 3.0).abs() < 1e-3, "source {i} trace {trace} not within 1e-3 of 3.0");

        for a in 0..3 {
            for b in 0..3 {
                if a != b {
                    assert!(
                        product[[a, b]].abs() <= 1e-3,
                        "source {i} off-diagonal [{a},{b}] = {} exceeds 1e-3",
                        product[[a, b]]
                    );
                }
            }
        }
    }
}

/// Rejected solution points produce exactly-zero row triplets in every
/// regularization level of every method.
#[test]
fn rejected_points_produce_zero_row_triplets_across_methods() {
    let k = synthetic_lead_field(5, 4);
    let points = chain_points(5);
    let graph = NeighborhoodGraph::for_class(&points, 1.0, NeighborhoodClass::Six);
    let mut rejected = RejectedSet::new();
    rejected.insert(1);
    rejected.insert(3);

    for method in [
        InverseMethod::Mn,
        InverseMethod::Wmn,
        InverseMethod::SLoreta,
        InverseMethod::ELoreta,
        InverseMethod::Dale,
    ] {
        let config = InverseMethodConfig { method, num_saved_regularizations: 3 };
        let built = build_operator(&k, &rejected, &graph, &points, &config).unwrap();
        for matrix in &built.matrices {
            for &rejected_source in &[1usize, 3] {
                for axis in 0..3 {
                    let row = matrix.row(rejected_source * 3 + axis);
                    let max_abs = row.iter().fold(0.0_f64, |acc, &v| acc.max(v.abs()));
                    assert!(
                        max_abs == 0.0,
                        "{:?}: source {rejected_source} axis {axis} row not zero (max abs {max_abs})",
                        method
                    );
                }
            }
        }
    }
}

/// The regularization schedule is strictly increasing for r >= 1, with
/// regv[0] = 0 except for Dale, where regv[0] = regv[1] / 10.
#[test]
fn regularization_schedule_is_monotonic_per_method() {
    let k = synthetic_lead_field(3, 3);
    let points = chain_points(3);
    let graph = NeighborhoodGraph::for_class(&points, 1.0, NeighborhoodClass::Six);
    let rejected = RejectedSet::new();

    for method in [
        InverseMethod::Mn,
        InverseMethod::Wmn,
        InverseMethod::SLoreta,
        InverseMethod::ELoreta,
        InverseMethod::Dale,
    ] {
        let config = InverseMethodConfig { method, num_saved_regularizations: 5 };
        let built = build_operator(&k, &rejected, &graph, &points, &config).unwrap();
        let regv = &built.regularizations;

        if method == InverseMethod::Dale {
            assert!((regv[0] - regv[1] / 10.0).abs() < 1e-9);
        } else {
            assert_eq!(regv[0], 0.0);
        }
        for r in 1..regv.len() - 1 {
            assert!(regv[r + 1] > regv[r], "{:?}: regv not increasing at r={r}", method);
        }
    }
}
