use ndarray::Array2;
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::Normal;

use crate::{MlErr, Result};

/// The weight scale used when none is configured.
pub const DEFAULT_INIT_SCALE: f64 = 0.01;

/// Generates the initial state of a network's parameters.
///
/// Weights are drawn i.i.d. from a standard normal distribution scaled by `scale`, biases
/// start at exactly zero. A small scale keeps the first pre-activations close to zero.
#[derive(Clone, Copy, Debug)]
pub struct ParamInit {
    scale: f64,
    distribution: Normal<f64>,
}

impl ParamInit {
    /// Creates a new `ParamInit`.
    ///
    /// # Arguments
    /// * `scale` - The standard deviation of the weights.
    ///
    /// # Returns
    /// An `InvalidInitScale` error if `scale` is not a positive finite number.
    pub fn normal(scale: f64) -> Result<Self> {
        if !(scale.is_finite() && scale > 0.) {
            return Err(MlErr::InvalidInitScale(scale));
        }

        Ok(Self {
            scale,
            distribution: Normal::new(0., scale)?,
        })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Samples a `(rows, cols)` weight matrix.
    pub fn weights<R: Rng + ?Sized>(&self, dim: (usize, usize), rng: &mut R) -> Array2<f64> {
        Array2::random_using(dim, self.distribution, rng)
    }

    /// Returns a zeroed `(rows, 1)` bias column.
    pub fn biases(&self, rows: usize) -> Array2<f64> {
        Array2::zeros((rows, 1))
    }
}

impl Default for ParamInit {
    fn default() -> Self {
        Self {
            scale: DEFAULT_INIT_SCALE,
            // SAFETY: The default scale is positive and finite.
            distribution: Normal::new(0., DEFAULT_INIT_SCALE).unwrap(),
        }
    }
}
