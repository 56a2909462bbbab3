//! The result of building one inverse method: its regularization
//! schedule and one inverse-operator matrix per level, each shaped like
//! the lead field (`Ns*3 x Nelec`) so it serializes with `esi-io`
//! unchanged.

use ndarray::Array2;

#[derive(Debug, Clone)]
pub struct BuiltOperator {
    pub regularizations: Vec<f64>,
    pub matrices: Vec<Array2<f64>>,
}
