use ndarray::{Array2, ArrayView2, Zip};

use super::LossFn;
use crate::{MlErr, Result};

/// Binary cross entropy, paired with a sigmoid output layer.
///
/// By default predictions are used as they come, so a prediction of exactly 0 or 1 makes the
/// cost non-finite: infinite when it's wrong and NaN when it's right, since the unused term
/// still evaluates `0 * ln(0)`. With an epsilon, predictions are clamped to `[eps, 1 - eps]` before taking
/// logarithms. The epsilon never changes `output_delta`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BinaryCrossEntropy {
    epsilon: Option<f64>,
}

impl BinaryCrossEntropy {
    /// Returns a new unguarded `BinaryCrossEntropy`.
    pub fn new() -> Self {
        Self { epsilon: None }
    }

    /// Returns a new `BinaryCrossEntropy` that clamps predictions away from 0 and 1.
    ///
    /// # Arguments
    /// * `epsilon` - The clamping margin, must lie inside `(0, 0.5)`.
    ///
    /// # Returns
    /// An `InvalidEpsilon` error if `epsilon` is out of range.
    pub fn with_epsilon(epsilon: f64) -> Result<Self> {
        if !(epsilon > 0. && epsilon < 0.5) {
            return Err(MlErr::InvalidEpsilon(epsilon));
        }

        Ok(Self {
            epsilon: Some(epsilon),
        })
    }

    pub fn epsilon(&self) -> Option<f64> {
        self.epsilon
    }
}

impl LossFn for BinaryCrossEntropy {
    fn loss(&self, y_pred: ArrayView2<f64>, y: ArrayView2<f64>) -> f64 {
        let m = y.ncols() as f64;

        let total = Zip::from(y_pred).and(y).fold(0., |acc, &p, &t| {
            let p = match self.epsilon {
                Some(eps) => p.clamp(eps, 1. - eps),
                None => p,
            };

            acc + t * p.ln() + (1. - t) * (1. - p).ln()
        });

        -total / m
    }

    // Closed form of d(bce)/dA composed with the sigmoid's dA/dZ.
    fn output_delta(&self, y_pred: ArrayView2<f64>, y: ArrayView2<f64>) -> Array2<f64> {
        &y_pred - &y
    }
}
