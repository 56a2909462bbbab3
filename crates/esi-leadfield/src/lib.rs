//! LSMAC N-shell spherical head model lead-field matrix builder.
//!
//! Supports three analytic families (1-shell exact spherical, 3-shell
//! Ary approximation, N-shell exact spherical Legendre series) dispatched
//! from a [`LeadFieldPreset`], with per-electrode local sphere radii
//! obtained by probing a fitted head-surface model (LSMAC).

pub mod ary;
pub mod conductivity;
pub mod dipole;
pub mod legendre;
pub mod lsmac;
pub mod potential;
pub mod preset;

pub use conductivity::{skull_conductivity, split_compact_spongy, CompactSpongyConductivity};
pub use dipole::Dipole;
pub use lsmac::build_lead_field;
pub use preset::{ElectromagneticModel, LeadFieldPreset, RadiiModel, ShellSpec};
