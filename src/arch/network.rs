use ndarray::{Array2, ArrayView2, ArrayViewMut2};
use rand::Rng;

use super::{ForwardCache, Gradients, activations::ActFn, layers::Dense, loss::LossFn};
use crate::{MlErr, Result, initialization::ParamInit, optimization::Optimizer};

/// Predictions at or above this value are classified as `1`.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// A fully connected feed-forward network for binary classification.
///
/// Every hidden layer is activated with ReLU and the last one with a sigmoid. The network is
/// the parameter set: it owns one `Dense` record per layer, indexed in forward order.
#[derive(Clone, Debug, PartialEq)]
pub struct Network {
    layers: Vec<Dense>,
}

impl Network {
    /// Creates a new `Network` with freshly initialized parameters.
    ///
    /// # Arguments
    /// * `widths` - The layer widths `[n0, n1, ..., nL]`, `n0` being the amount of input
    ///   features and `nL` the amount of outputs.
    /// * `init` - The parameter initializer.
    /// * `rng` - The random source the weights are sampled from.
    ///
    /// # Returns
    /// A configuration error if there are fewer than two widths or any of them is zero.
    pub fn new<R: Rng + ?Sized>(widths: &[usize], init: &ParamInit, rng: &mut R) -> Result<Self> {
        validate_widths(widths)?;

        let nlayers = widths.len() - 1;
        let layers = widths
            .windows(2)
            .enumerate()
            .map(|(i, dim)| {
                let (fan_in, fan_out) = (dim[0], dim[1]);
                let act_fn = if i + 1 == nlayers {
                    ActFn::sigmoid()
                } else {
                    ActFn::relu()
                };

                Dense::new(
                    init.weights((fan_out, fan_in), rng),
                    init.biases(fan_out),
                    act_fn,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { layers })
    }

    /// Creates a new `Network` out of already built layers.
    ///
    /// # Returns
    /// An error if there are no layers, adjacent layers don't chain or a hidden layer isn't
    /// activated with ReLU and the output with a sigmoid.
    pub fn from_layers(layers: Vec<Dense>) -> Result<Self> {
        if layers.is_empty() {
            return Err(MlErr::TooFewLayers { got: 0 });
        }

        let output = layers.len() - 1;
        for (i, layer) in layers.iter().enumerate() {
            let expected = if i == output {
                ActFn::sigmoid()
            } else {
                ActFn::relu()
            };

            if layer.act_fn() != expected {
                return Err(MlErr::InvalidActivation { layer: i + 1 });
            }
        }

        for (i, layer) in layers.iter().enumerate() {
            if layer.fan_in() == 0 {
                return Err(MlErr::InvalidLayerWidth { layer: i });
            }

            if layer.fan_out() == 0 {
                return Err(MlErr::InvalidLayerWidth { layer: i + 1 });
            }
        }

        for pair in layers.windows(2) {
            if pair[1].fan_in() != pair[0].fan_out() {
                return Err(MlErr::SizeMismatch {
                    a: "layer fan in",
                    b: "previous layer fan out",
                    got: pair[1].fan_in(),
                    expected: pair[0].fan_out(),
                });
            }
        }

        Ok(Self { layers })
    }

    pub fn layers(&self) -> &[Dense] {
        &self.layers
    }

    /// Mutable view of the weights of layer `layer`, `None` if there's no such layer.
    ///
    /// The values can be changed but not the shape.
    pub fn weights_mut(&mut self, layer: usize) -> Option<ArrayViewMut2<'_, f64>> {
        self.layers.get_mut(layer).map(Dense::weights_mut)
    }

    /// Mutable view of the biases of layer `layer`, `None` if there's no such layer.
    pub fn biases_mut(&mut self, layer: usize) -> Option<ArrayViewMut2<'_, f64>> {
        self.layers.get_mut(layer).map(Dense::biases_mut)
    }

    /// The amount of layers, excluding the input.
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// Returns the layer widths `[n0, ..., nL]` this network was built with.
    pub fn widths(&self) -> Vec<usize> {
        let mut widths = Vec::with_capacity(self.layers.len() + 1);
        widths.push(self.input_width());
        widths.extend(self.layers.iter().map(Dense::fan_out));
        widths
    }

    pub fn input_width(&self) -> usize {
        self.layers[0].fan_in()
    }

    pub fn output_width(&self) -> usize {
        self.layers[self.layers.len() - 1].fan_out()
    }

    /// Returns the amount of parameters in the network.
    pub fn size(&self) -> usize {
        self.layers.iter().map(Dense::size).sum()
    }

    /// Makes a forward pass through the network retaining every intermediate value.
    ///
    /// # Arguments
    /// * `x` - The input, `(n0, m)` with one sample per column.
    ///
    /// # Returns
    /// The cache of the pass or a `SizeMismatch` error if `x` doesn't have `n0` rows.
    pub fn forward(&self, x: ArrayView2<f64>) -> Result<ForwardCache> {
        let mut cache = ForwardCache::new(x.to_owned());

        for layer in &self.layers {
            let (z, a) = layer.forward(cache.output())?;
            cache.push(z, a);
        }

        Ok(cache)
    }

    /// Makes a forward pass through the network keeping only the output.
    ///
    /// # Returns
    /// The predictions `A[L]`, `(nL, m)`.
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        let mut a = x.to_owned();

        for layer in &self.layers {
            (_, a) = layer.forward(a.view())?;
        }

        Ok(a)
    }

    /// Predicts the class of every sample.
    ///
    /// # Returns
    /// A `(nL, m)` matrix of zeros and ones.
    pub fn classify(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        let y_pred = self.predict(x)?;
        Ok(y_pred.mapv_into(|p| if p >= DECISION_THRESHOLD { 1. } else { 0. }))
    }

    /// Computes the gradient of the loss with respect to every parameter of the network.
    ///
    /// # Arguments
    /// * `cache` - The cache of a forward pass made with these same parameters.
    /// * `y` - The labels, shaped like the network's output.
    /// * `loss_fn` - The loss function, it provides the output layer's delta.
    ///
    /// # Returns
    /// One gradient per layer, in forward order, or a `SizeMismatch` error if the cache or the
    /// labels don't belong to this network.
    pub fn backward<L: LossFn>(
        &self,
        cache: &ForwardCache,
        y: ArrayView2<f64>,
        loss_fn: &L,
    ) -> Result<Gradients> {
        self.check_cache(cache)?;

        let y_pred = cache.output();
        if y.dim() != y_pred.dim() {
            return Err(MlErr::SizeMismatch {
                a: "labels",
                b: "predictions",
                got: y.len(),
                expected: y_pred.len(),
            });
        }

        let activations = cache.activations();
        let pre_activations = cache.pre_activations();
        let mut grads = Vec::with_capacity(self.layers.len());
        let mut d = loss_fn.output_delta(y_pred, y);

        for (i, layer) in self.layers.iter().enumerate().rev() {
            grads.push(layer.backward(d.view(), activations[i].view()));

            if i == 0 {
                break;
            }

            let mask = self.layers[i - 1]
                .act_fn()
                .derivative(pre_activations[i - 1].view());
            d = layer.propagate(d.view()) * &mask;
        }

        grads.reverse();
        Ok(Gradients::new(grads))
    }

    /// Takes an optimization step on every layer.
    ///
    /// # Returns
    /// A `SizeMismatch` error if the gradients don't belong to this network, in which case the
    /// parameters are left untouched.
    pub fn update<O: Optimizer>(&mut self, grads: &Gradients, optimizer: &mut O) -> Result<()> {
        if grads.len() != self.layers.len() {
            return Err(MlErr::SizeMismatch {
                a: "gradients",
                b: "layers",
                got: grads.len(),
                expected: self.layers.len(),
            });
        }

        for (layer, grad) in self.layers.iter().zip(grads.layers()) {
            if grad.dw().dim() != layer.weights().dim() || grad.db().dim() != layer.biases().dim()
            {
                return Err(MlErr::SizeMismatch {
                    a: "layer gradient",
                    b: "layer parameters",
                    got: grad.dw().len() + grad.db().len(),
                    expected: layer.size(),
                });
            }
        }

        for (layer, grad) in self.layers.iter_mut().zip(grads.layers()) {
            layer.apply_grad(grad, optimizer)?;
        }

        Ok(())
    }

    fn check_cache(&self, cache: &ForwardCache) -> Result<()> {
        if cache.depth() != self.layers.len() {
            return Err(MlErr::SizeMismatch {
                a: "cached layers",
                b: "network layers",
                got: cache.depth(),
                expected: self.layers.len(),
            });
        }

        let input = &cache.activations()[0];
        if input.nrows() != self.input_width() {
            return Err(MlErr::SizeMismatch {
                a: "cached input rows",
                b: "input width",
                got: input.nrows(),
                expected: self.input_width(),
            });
        }

        for (z, layer) in cache.pre_activations().iter().zip(&self.layers) {
            if z.nrows() != layer.fan_out() || z.ncols() != input.ncols() {
                return Err(MlErr::SizeMismatch {
                    a: "cached pre-activation",
                    b: "layer output",
                    got: z.nrows(),
                    expected: layer.fan_out(),
                });
            }
        }

        Ok(())
    }
}

/// Checks a layer width sequence: at least input and output, all of them non-zero.
pub fn validate_widths(widths: &[usize]) -> Result<()> {
    if widths.len() < 2 {
        return Err(MlErr::TooFewLayers { got: widths.len() });
    }

    if let Some(layer) = widths.iter().position(|&w| w == 0) {
        return Err(MlErr::InvalidLayerWidth { layer });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use ndarray::{Array2, array};
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{arch::loss::BinaryCrossEntropy, optimization::GradientDescent};

    fn seeded_rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn network(widths: &[usize]) -> Network {
        let init = ParamInit::default();
        Network::new(widths, &init, &mut seeded_rng()).unwrap()
    }

    fn assert_close(a: ArrayView2<f64>, b: ArrayView2<f64>) {
        assert_eq!(a.dim(), b.dim());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-15, "{x} != {y}");
        }
    }

    fn single_unit_chain(w1: f64) -> Network {
        Network::from_layers(vec![
            Dense::new(array![[w1]], array![[0.]], ActFn::relu()).unwrap(),
            Dense::new(array![[1.]], array![[0.]], ActFn::sigmoid()).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_invalid_widths() {
        let init = ParamInit::default();
        let mut rng = seeded_rng();

        assert!(matches!(
            Network::new(&[], &init, &mut rng),
            Err(MlErr::TooFewLayers { got: 0 })
        ));
        assert!(matches!(
            Network::new(&[3], &init, &mut rng),
            Err(MlErr::TooFewLayers { got: 1 })
        ));
        assert!(matches!(
            Network::new(&[2, 0, 1], &init, &mut rng),
            Err(MlErr::InvalidLayerWidth { layer: 1 })
        ));
        assert!(matches!(
            Network::new(&[0, 1], &init, &mut rng),
            Err(MlErr::InvalidLayerWidth { layer: 0 })
        ));
    }

    #[test]
    fn parameters_follow_the_widths() {
        let widths = [2, 4, 3, 1];
        let net = network(&widths);

        assert_eq!(net.depth(), 3);
        assert_eq!(net.widths(), widths);
        assert_eq!(net.size(), (2 * 4 + 4) + (4 * 3 + 3) + (3 + 1));

        for (layer, dim) in net.layers().iter().zip(widths.windows(2)) {
            assert_eq!(layer.weights().dim(), (dim[1], dim[0]));
            assert_eq!(layer.biases().dim(), (dim[1], 1));
            assert!(layer.biases().iter().all(|&b| b == 0.));
        }
    }

    #[test]
    fn hidden_layers_use_relu_and_output_uses_sigmoid() {
        let net = network(&[3, 5, 5, 2]);
        let act_fns: Vec<_> = net.layers().iter().map(Dense::act_fn).collect();
        assert_eq!(act_fns, [ActFn::relu(), ActFn::relu(), ActFn::sigmoid()]);
    }

    #[test]
    fn forward_and_backward_shapes() {
        for widths in [vec![1, 1], vec![2, 4, 3, 1], vec![5, 2, 7, 3, 1]] {
            let net = network(&widths);

            for m in [1, 2, 9] {
                let x = Array2::from_elem((widths[0], m), 0.3);
                let y = Array2::from_elem((1, m), 1.);

                let cache = net.forward(x.view()).unwrap();
                assert_eq!(cache.depth(), net.depth());
                assert_eq!(cache.output().dim(), (1, m));
                assert_eq!(net.predict(x.view()).unwrap().dim(), (1, m));

                let grads = net.backward(&cache, y.view(), &BinaryCrossEntropy::new()).unwrap();
                assert_eq!(grads.len(), net.depth());

                for (grad, layer) in grads.layers().iter().zip(net.layers()) {
                    assert_eq!(grad.dw().dim(), layer.weights().dim());
                    assert_eq!(grad.db().dim(), layer.biases().dim());
                }
            }
        }
    }

    #[test]
    fn forward_rejects_wrong_feature_count() {
        let net = network(&[2, 3, 1]);
        let x = Array2::zeros((3, 4));

        assert!(matches!(
            net.forward(x.view()),
            Err(MlErr::SizeMismatch { got: 3, expected: 2, .. })
        ));
        assert!(net.predict(x.view()).is_err());
    }

    #[test]
    fn forward_caches_every_layer() {
        let net = single_unit_chain(2.);
        let x = array![[-1., 0.5]];

        let cache = net.forward(x.view()).unwrap();

        assert_eq!(cache.activations()[0], x);
        assert_eq!(cache.pre_activations()[0], array![[-2., 1.]]);
        assert_eq!(cache.activations()[1], array![[0., 1.]]);
        assert_eq!(cache.pre_activations()[1], array![[0., 1.]]);
        assert_eq!(cache.output()[[0, 0]], 0.5);
    }

    #[test]
    fn relu_mask_is_zero_at_zero_pre_activation() {
        let net = single_unit_chain(1.);
        let loss = BinaryCrossEntropy::new();
        let y = array![[0.]];

        for (input, mask) in [(-1., 0.), (0., 0.), (1., 1.)] {
            let x = array![[input]];
            let cache = net.forward(x.view()).unwrap();
            let grads = net.backward(&cache, y.view(), &loss).unwrap();

            let d_out = cache.output()[[0, 0]] - y[[0, 0]];
            let db_hidden = grads.layers()[0].db()[[0, 0]];
            assert_eq!(db_hidden, d_out * mask, "input {input}");
        }
    }

    #[test]
    fn single_sample_bias_gradient_is_the_delta() {
        let net = network(&[3, 2, 1]);
        let x = array![[0.2], [-0.4], [1.3]];
        let y = array![[1.]];

        let cache = net.forward(x.view()).unwrap();
        let grads = net.backward(&cache, y.view(), &BinaryCrossEntropy::new()).unwrap();

        let out = &grads.layers()[1];
        assert_eq!(out.db().dim(), (1, 1));
        assert_eq!(out.db()[[0, 0]], cache.output()[[0, 0]] - 1.);
    }

    #[test]
    fn backward_rejects_a_foreign_cache() {
        let net = network(&[2, 3, 1]);
        let other = network(&[2, 4, 4, 1]);
        let x = Array2::zeros((2, 5));
        let y = Array2::zeros((1, 5));

        let cache = other.forward(x.view()).unwrap();
        let res = net.backward(&cache, y.view(), &BinaryCrossEntropy::new());
        assert!(matches!(res, Err(MlErr::SizeMismatch { .. })));
    }

    #[test]
    fn backward_rejects_mismatched_labels() {
        let net = network(&[2, 3, 1]);
        let x = Array2::zeros((2, 5));
        let y = Array2::zeros((1, 4));

        let cache = net.forward(x.view()).unwrap();
        let res = net.backward(&cache, y.view(), &BinaryCrossEntropy::new());
        assert!(matches!(res, Err(MlErr::SizeMismatch { a: "labels", .. })));
    }

    #[test]
    fn update_takes_a_gradient_descent_step() {
        let mut net = network(&[2, 3, 1]);
        let before = net.clone();
        let x = array![[0.5, -1., 2.], [1., 0.3, -0.7]];
        let y = array![[1., 0., 1.]];

        let cache = net.forward(x.view()).unwrap();
        let grads = net.backward(&cache, y.view(), &BinaryCrossEntropy::new()).unwrap();
        let mut optimizer = GradientDescent::new(0.1).unwrap();
        net.update(&grads, &mut optimizer).unwrap();

        for ((old, new), grad) in before.layers().iter().zip(net.layers()).zip(grads.layers()) {
            let expected_w = &old.weights() - &(&grad.dw() * 0.1);
            let expected_b = &old.biases() - &(&grad.db() * 0.1);
            assert_close(new.weights(), expected_w.view());
            assert_close(new.biases(), expected_b.view());
        }
    }

    #[test]
    fn update_rejects_foreign_gradients() {
        let mut net = network(&[2, 3, 1]);
        let other = network(&[2, 2, 1]);
        let x = Array2::zeros((2, 2));
        let y = Array2::zeros((1, 2));

        let cache = other.forward(x.view()).unwrap();
        let grads = other.backward(&cache, y.view(), &BinaryCrossEntropy::new()).unwrap();
        let before = net.clone();

        let mut optimizer = GradientDescent::new(0.1).unwrap();
        assert!(net.update(&grads, &mut optimizer).is_err());
        assert_eq!(net, before);
    }

    #[test]
    fn classify_thresholds_predictions() {
        let net = single_unit_chain(1.);
        // outputs sigmoid(relu(x)): 0.5 at x <= 0, above 0.5 otherwise
        let classes = net.classify(array![[-3., 0., 2.]].view()).unwrap();
        assert_eq!(classes, array![[1., 1., 1.]]);

        let net = Network::from_layers(vec![
            Dense::new(array![[-1.]], array![[-0.5]], ActFn::sigmoid()).unwrap(),
        ])
        .unwrap();
        let classes = net.classify(array![[-3., 0., 2.]].view()).unwrap();
        assert_eq!(classes, array![[1., 0., 0.]]);
    }

    #[test]
    fn from_layers_rejects_broken_chains() {
        let res = Network::from_layers(vec![
            Dense::new(array![[1., 2.]], array![[0.]], ActFn::relu()).unwrap(),
            Dense::new(array![[1., 1.]], array![[0.]], ActFn::sigmoid()).unwrap(),
        ]);
        assert!(matches!(res, Err(MlErr::SizeMismatch { .. })));
        assert!(Network::from_layers(vec![]).is_err());
    }

    #[test]
    fn from_layers_enforces_relu_hidden_and_sigmoid_output() {
        let relu_output = Network::from_layers(vec![
            Dense::new(array![[0.7]], array![[0.1]], ActFn::relu()).unwrap(),
        ]);
        assert!(matches!(
            relu_output,
            Err(MlErr::InvalidActivation { layer: 1 })
        ));

        let sigmoid_hidden = Network::from_layers(vec![
            Dense::new(array![[1.]], array![[0.]], ActFn::sigmoid()).unwrap(),
            Dense::new(array![[1.]], array![[0.]], ActFn::sigmoid()).unwrap(),
        ]);
        assert!(matches!(
            sigmoid_hidden,
            Err(MlErr::InvalidActivation { layer: 1 })
        ));
    }

    #[test]
    fn parameter_views_mutate_values_but_not_shapes() {
        let mut net = network(&[2, 3, 1]);

        net.weights_mut(0).unwrap()[[1, 0]] = 5.;
        net.biases_mut(1).unwrap().fill(-1.);

        assert_eq!(net.layers()[0].weights()[[1, 0]], 5.);
        assert_eq!(net.layers()[1].biases(), array![[-1.]]);
        assert_eq!(net.widths(), vec![2, 3, 1]);
        assert!(net.weights_mut(2).is_none());
        assert!(net.biases_mut(2).is_none());
    }
}
