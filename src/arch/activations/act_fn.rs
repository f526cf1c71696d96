use ndarray::{Array2, ArrayView2};

use super::{Relu, Sigmoid};

/// The activation applied after a layer's linear transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActFn {
    Relu(Relu),
    Sigmoid(Sigmoid),
}

impl ActFn {
    pub fn relu() -> Self {
        Self::Relu(Relu)
    }

    pub fn sigmoid() -> Self {
        Self::Sigmoid(Sigmoid)
    }

    pub fn f(&self, z: f64) -> f64 {
        match self {
            Self::Relu(a) => a.f(z),
            Self::Sigmoid(a) => a.f(z),
        }
    }

    pub fn df(&self, z: f64) -> f64 {
        match self {
            Self::Relu(a) => a.df(z),
            Self::Sigmoid(a) => a.df(z),
        }
    }

    /// Applies the activation elementwise to a matrix of pre-activations.
    pub fn apply(&self, z: ArrayView2<f64>) -> Array2<f64> {
        z.mapv(|z| self.f(z))
    }

    /// Elementwise derivative of the activation evaluated at the pre-activations `z`.
    pub fn derivative(&self, z: ArrayView2<f64>) -> Array2<f64> {
        z.mapv(|z| self.df(z))
    }
}
