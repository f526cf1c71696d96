use ndarray::{Array2, ArrayView2, Axis};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::{MlErr, Result};

/// A labeled binary classification dataset.
///
/// Inputs are stored `(n_features, m)` and labels `(n_outputs, m)`, one sample per column.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    x: Array2<f64>,
    y: Array2<f64>,
}

impl Dataset {
    /// Creates a new `Dataset`.
    ///
    /// # Arguments
    /// * `x` - The inputs, one sample per column.
    /// * `y` - The labels, one sample per column, every entry `0` or `1`.
    ///
    /// # Returns
    /// An error if there are no samples, the sample counts differ or a label is not binary.
    pub fn new(x: Array2<f64>, y: Array2<f64>) -> Result<Self> {
        if x.ncols() == 0 || x.nrows() == 0 || y.nrows() == 0 {
            return Err(MlErr::EmptyDataset);
        }

        if y.ncols() != x.ncols() {
            return Err(MlErr::SizeMismatch {
                a: "label samples",
                b: "input samples",
                got: y.ncols(),
                expected: x.ncols(),
            });
        }

        if let Some(((_, sample), &value)) = y.indexed_iter().find(|&(_, &v)| v != 0. && v != 1.) {
            return Err(MlErr::InvalidLabel { sample, value });
        }

        Ok(Self { x, y })
    }

    /// Generates a linearly separable dataset with two standard normal features.
    ///
    /// A sample is labeled `1` when the sum of its features is positive and `0` otherwise.
    ///
    /// # Arguments
    /// * `len` - The amount of samples.
    /// * `rng` - The random source the features are sampled from.
    pub fn linearly_separable<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Result<Self> {
        let x = Array2::random_using((2, len), StandardNormal, rng);
        let y = x
            .map_axis(Axis(0), |sample| if sample.sum() > 0. { 1. } else { 0. })
            .insert_axis(Axis(0));

        Self::new(x, y)
    }

    pub fn x(&self) -> ArrayView2<'_, f64> {
        self.x.view()
    }

    pub fn y(&self) -> ArrayView2<'_, f64> {
        self.y.view()
    }

    /// The amount of samples, `m`.
    pub fn len(&self) -> usize {
        self.x.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn n_features(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_outputs(&self) -> usize {
        self.y.nrows()
    }
}
