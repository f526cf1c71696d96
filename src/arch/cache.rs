use ndarray::{Array2, ArrayView2};

/// The values retained by a single forward pass.
///
/// Holds the post-activations `A[0..=L]`, where `A[0]` is the input, and the
/// pre-activations `Z[1..=L]`. A cache belongs to the pass that produced it and is consumed by
/// the matching backward pass.
#[derive(Clone, Debug)]
pub struct ForwardCache {
    activations: Vec<Array2<f64>>,
    pre_activations: Vec<Array2<f64>>,
}

impl ForwardCache {
    pub(super) fn new(x: Array2<f64>) -> Self {
        Self {
            activations: vec![x],
            pre_activations: Vec::new(),
        }
    }

    pub(super) fn push(&mut self, z: Array2<f64>, a: Array2<f64>) {
        self.pre_activations.push(z);
        self.activations.push(a);
    }

    /// The amount of layers this cache went through.
    pub fn depth(&self) -> usize {
        self.pre_activations.len()
    }

    /// The post-activations, indexed by layer number (`0` is the input).
    pub fn activations(&self) -> &[Array2<f64>] {
        &self.activations
    }

    /// The pre-activations, where index `i` holds `Z[i + 1]`.
    pub fn pre_activations(&self) -> &[Array2<f64>] {
        &self.pre_activations
    }

    /// The output of the last layer, `A[L]`.
    pub fn output(&self) -> ArrayView2<'_, f64> {
        // SAFETY: `activations` always holds at least the input.
        self.activations[self.activations.len() - 1].view()
    }
}
