use ndarray::{ArrayView2, ArrayViewMut2};

pub trait Optimizer {
    /// Updates `params` in place given their gradient, both share the same shape.
    fn update_params(&mut self, params: ArrayViewMut2<f64>, grad: ArrayView2<f64>);
}
