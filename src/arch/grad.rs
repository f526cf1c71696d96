use ndarray::{Array2, ArrayView2};

/// The gradient of the cost with respect to one layer's weights and biases.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerGrad {
    dw: Array2<f64>,
    db: Array2<f64>,
}

impl LayerGrad {
    pub fn new(dw: Array2<f64>, db: Array2<f64>) -> Self {
        Self { dw, db }
    }

    /// Gradient of the weights, shaped like the layer's weight matrix.
    pub fn dw(&self) -> ArrayView2<'_, f64> {
        self.dw.view()
    }

    /// Gradient of the biases, a column vector shaped like the layer's biases.
    pub fn db(&self) -> ArrayView2<'_, f64> {
        self.db.view()
    }
}

/// The gradients of a whole network, one `LayerGrad` per layer in forward order.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradients {
    layers: Vec<LayerGrad>,
}

impl Gradients {
    pub fn new(layers: Vec<LayerGrad>) -> Self {
        Self { layers }
    }

    pub fn layers(&self) -> &[LayerGrad] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
