use ndarray::{Array2, ArrayView2, ArrayViewMut2, Axis};

use crate::{
    MlErr, Result,
    arch::{LayerGrad, activations::ActFn},
    optimization::Optimizer,
};

/// A fully connected layer followed by an activation.
///
/// The weights are shaped `(fan_out, fan_in)` and the biases `(fan_out, 1)`, samples travel
/// through the layer as the columns of the input matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct Dense {
    weights: Array2<f64>,
    biases: Array2<f64>,
    act_fn: ActFn,
}

impl Dense {
    /// Creates a new `Dense` layer.
    ///
    /// # Arguments
    /// * `weights` - The `(fan_out, fan_in)` weight matrix.
    /// * `biases` - The `(fan_out, 1)` bias column.
    /// * `act_fn` - The activation applied to the linear transform.
    ///
    /// # Returns
    /// A `SizeMismatch` error if the biases don't match the weights.
    pub fn new(weights: Array2<f64>, biases: Array2<f64>, act_fn: ActFn) -> Result<Self> {
        if biases.ncols() != 1 {
            return Err(MlErr::SizeMismatch {
                a: "bias columns",
                b: "a column vector",
                got: biases.ncols(),
                expected: 1,
            });
        }

        if biases.nrows() != weights.nrows() {
            return Err(MlErr::SizeMismatch {
                a: "bias rows",
                b: "weight rows",
                got: biases.nrows(),
                expected: weights.nrows(),
            });
        }

        Ok(Self {
            weights,
            biases,
            act_fn,
        })
    }

    pub fn fan_in(&self) -> usize {
        self.weights.ncols()
    }

    pub fn fan_out(&self) -> usize {
        self.weights.nrows()
    }

    /// Returns the amount of parameters this layer has.
    pub fn size(&self) -> usize {
        self.weights.len() + self.biases.len()
    }

    pub fn act_fn(&self) -> ActFn {
        self.act_fn
    }

    pub fn weights(&self) -> ArrayView2<'_, f64> {
        self.weights.view()
    }

    pub fn biases(&self) -> ArrayView2<'_, f64> {
        self.biases.view()
    }

    pub fn weights_mut(&mut self) -> ArrayViewMut2<'_, f64> {
        self.weights.view_mut()
    }

    pub fn biases_mut(&mut self) -> ArrayViewMut2<'_, f64> {
        self.biases.view_mut()
    }

    /// Computes `Z = W·A + b` and `A' = act(Z)` for a batch of column samples.
    ///
    /// # Arguments
    /// * `x` - The previous layer's post-activations, `(fan_in, m)`.
    ///
    /// # Returns
    /// The pre-activations and post-activations, both `(fan_out, m)`.
    pub fn forward(&self, x: ArrayView2<f64>) -> Result<(Array2<f64>, Array2<f64>)> {
        if x.nrows() != self.fan_in() {
            return Err(MlErr::SizeMismatch {
                a: "layer input rows",
                b: "layer fan in",
                got: x.nrows(),
                expected: self.fan_in(),
            });
        }

        let z = self.weights.dot(&x) + &self.biases;
        let a = self.act_fn.apply(z.view());
        Ok((z, a))
    }

    /// Computes this layer's parameter gradients from its delta.
    ///
    /// # Arguments
    /// * `d` - The gradient of the loss with respect to this layer's pre-activations, `dZ`.
    /// * `x` - The input this layer received on the forward pass, `A[l-1]`.
    pub fn backward(&self, d: ArrayView2<f64>, x: ArrayView2<f64>) -> LayerGrad {
        let m = d.ncols() as f64;

        let dw = d.dot(&x.t()) / m;
        let db = d.sum_axis(Axis(1)).insert_axis(Axis(1)) / m;
        LayerGrad::new(dw, db)
    }

    /// Carries this layer's delta back through its weights, `W^T · dZ`.
    ///
    /// The previous layer still has to mask the result with its activation's derivative.
    pub fn propagate(&self, d: ArrayView2<f64>) -> Array2<f64> {
        self.weights.t().dot(&d)
    }

    /// Takes an optimization step on this layer's parameters.
    ///
    /// # Returns
    /// A `SizeMismatch` error if the gradient isn't shaped like this layer.
    pub fn apply_grad<O: Optimizer>(&mut self, grad: &LayerGrad, optimizer: &mut O) -> Result<()> {
        if grad.dw().dim() != self.weights.dim() {
            return Err(MlErr::SizeMismatch {
                a: "weight gradient",
                b: "weights",
                got: grad.dw().len(),
                expected: self.weights.len(),
            });
        }

        if grad.db().dim() != self.biases.dim() {
            return Err(MlErr::SizeMismatch {
                a: "bias gradient",
                b: "biases",
                got: grad.db().len(),
                expected: self.biases.len(),
            });
        }

        optimizer.update_params(self.weights.view_mut(), grad.dw());
        optimizer.update_params(self.biases.view_mut(), grad.db());
        Ok(())
    }
}
