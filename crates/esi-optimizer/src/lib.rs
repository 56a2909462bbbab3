//! Dimension-agnostic derivative-free global optimizer.
//!
//! Callers describe the parameters to search as one or more [`GoGroup`]s,
//! supply a [`CostFn`], and pick a [`SearchMethod`] (Box-Scan, Cross-Hair
//! or Nelder-Mead) plus a group-traversal [`Strategy`]. The optimizer
//! knows nothing about what the parameters mean; [`ParamKind`] is an
//! opaque tag the caller's cost function interprets.

pub mod box_scan;
pub mod cost;
pub mod cross_hair;
pub mod grid;
pub mod nelder_mead;
pub mod optimizer;
pub mod param;
pub mod precision;
pub mod strategy;

pub use box_scan::StepOutcome;
pub use cost::{CostFn, EVALUATE_FAILURE_SENTINEL};
pub use nelder_mead::Simplex;
pub use optimizer::{Optimizer, OptimizerResult, SearchMethod, DEFAULT_MAX_ITERATIONS};
pub use param::{GoGroup, GoParam, ParamKind};
pub use precision::PrecisionTracker;
pub use strategy::Strategy;
