//! Point-set geometry: bounding boxes, point-cloud summary statistics,
//! parametric shape fitting and the inverse-center fusion that seeds the
//! whole ESI pipeline with a common origin.

pub mod bounding_box;
pub mod fit_model;
pub mod fusion;
pub mod param_kinds;
pub mod point;
pub mod pset;

pub use bounding_box::BoundingBox;
pub use fit_model::FitModelOnPoints;
pub use fusion::{fit_head_surface_model, fuse_inverse_center};
pub use point::Point;
pub use pset::Pset;

pub use esi_optimizer::ParamKind;
