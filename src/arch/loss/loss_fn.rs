use ndarray::{Array2, ArrayView2};

pub trait LossFn {
    /// Computes the scalar cost of the predictions `y_pred` against the labels `y`, averaged
    /// over the samples (columns).
    fn loss(&self, y_pred: ArrayView2<f64>, y: ArrayView2<f64>) -> f64;

    /// Computes the gradient of the per-sample loss with respect to the output layer's
    /// pre-activation `Z[L]`, that is, the starting delta of backpropagation.
    ///
    /// The result is not averaged, the `1/m` factor is applied when the layer gradients are
    /// computed.
    fn output_delta(&self, y_pred: ArrayView2<f64>, y: ArrayView2<f64>) -> Array2<f64>;
}
