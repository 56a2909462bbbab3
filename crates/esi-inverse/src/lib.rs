//! Inverse-operator builders: turns a lead field and a solution-point
//! neighborhood graph into a stack of regularized inverse operators, one
//! matrix per level for each requested method, plus the resolution
//! (point-spread) matrix derived from them.
//!
//! Every builder shares the lead field's row-triplet convention: `K` is
//! `Ns*3 x Nelec` (rows are a source's x/y/z dipole columns, columns are
//! electrodes), the transpose of the electrodes-by-sources convention a
//! textbook derivation uses. Because of that transpose, `Kᵀ · PInv(...)`
//! in the textbook form is simply `K · PInv(...)` here — no explicit
//! transpose appears anywhere in this crate.

pub mod laplacian;
pub mod method;
pub mod methods;
pub mod operator;
pub mod resolution;
pub mod shared;

pub use method::{InverseMethod, InverseMethodConfig, ELORETA_CONVERGENCE, ELORETA_MAX_ITERATIONS, LAURA_POWER};
pub use operator::BuiltOperator;
pub use resolution::{build_resolution_matrix, ResolutionMatrices};

use esi_common::Result;
use esi_geometry::Pset;
use esi_solution_points::{NeighborhoodGraph, RejectedSet};
use ndarray::Array2;

/// Builds one [`BuiltOperator`] for the method named in `config`.
///
/// `graph` and `points` are only consulted by the methods that need
/// them (LORETA and LAURA); the others ignore the arguments they don't
/// use.
pub fn build_operator(
    k: &Array2<f64>,
    rejected: &RejectedSet,
    graph: &NeighborhoodGraph,
    points: &Pset,
    config: &InverseMethodConfig,
) -> Result<BuiltOperator> {
    Ok(match config.method {
        InverseMethod::Mn => methods::mn::build(k, rejected, config),
        InverseMethod::Wmn => methods::wmn::build(k, rejected, config),
        InverseMethod::Loreta => methods::loreta::build(k, rejected, graph, config)?,
        InverseMethod::SLoreta => methods::sloreta::build(k, rejected, config),
        InverseMethod::ELoreta => methods::eloreta::build(k, rejected, config),
        InverseMethod::Dale => methods::dale::build(k, rejected, config),
        InverseMethod::Laura => methods::laura::build(k, rejected, graph, points, config)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use esi_solution_points::NeighborhoodClass;
    use ndarray::arr2;

    #[test]
    fn dispatches_every_method_to_a_finite_operator() {
        let points = Pset::from_coords(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        let graph = NeighborhoodGraph::for_class(&points, points.step(), NeighborhoodClass::Six);
        let k = arr2(&[
            [1.0, 0.5],
            [0.2, 1.0],
            [0.0, 0.3],
            [0.4, 0.1],
            [0.1, 0.2],
            [0.3, 0.0],
            [0.2, 0.4],
            [0.5, 0.1],
            [0.0, 0.6],
        ]);
        let rejected = RejectedSet::new();

        for method in [
            InverseMethod::Mn,
            InverseMethod::Wmn,
            InverseMethod::Loreta,
            InverseMethod::SLoreta,
            InverseMethod::ELoreta,
            InverseMethod::Dale,
            InverseMethod::Laura,
        ] {
            let config = InverseMethodConfig { method, num_saved_regularizations: 2 };
            let built = build_operator(&k, &rejected, &graph, &points, &config).unwrap();
            assert_eq!(built.matrices.len(), 2);
            for m in &built.matrices {
                assert_eq!(m.dim(), (9, 2));
                assert!(m.iter().all(|v| v.is_finite()));
            }
        }
    }
}
