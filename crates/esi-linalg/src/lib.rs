//! Dense linear-algebra primitives for the ESI core: symmetric
//! eigendecomposition (N×N and analytic 3×3), SPD pseudo-inverse, the
//! average-reference centering matrix, and pivoted LU for the
//! Kronecker-free per-dimension solves used by LORETA and LAURA.

pub mod centering;
pub mod eigen;
pub mod eigen3;
pub mod inv_sqrt3;
pub mod lu;
pub mod pinv;

pub use centering::centering_matrix;
pub use eigen::{eig_sym, largest_eigenvalue, EigenDecomposition};
pub use eigen3::{eig_sym3, Eigen3, Sym3};
pub use inv_sqrt3::inv_sqrt_spd3;
pub use lu::{lu_solve, LuFactorization};
pub use pinv::pinv_spd;
