//! One module per inverse method, each exposing a `build` function with
//! the signature its algorithm needs (the graph-based methods take the
//! solution-point neighborhood graph; LAURA additionally needs point
//! coordinates for its distance weights).

pub mod dale;
pub mod eloreta;
pub mod loreta;
pub mod laura;
pub mod mn;
pub mod sloreta;
pub mod wmn;
