use std::num::NonZeroUsize;

use log::{debug, info, trace, warn};
use rand::{SeedableRng, rngs::StdRng};

use super::{CostHistory, TrainConfig};
use crate::{
    MlErr, Result,
    arch::{Network, loss::BinaryCrossEntropy, loss::LossFn},
    dataset::Dataset,
    initialization::ParamInit,
    optimization::{GradientDescent, Optimizer},
};

/// Full batch `Trainer`. Runs forward, cost, backward and update once per epoch over the
/// whole dataset.
pub struct Trainer<O, L>
where
    O: Optimizer,
    L: LossFn,
{
    optimizer: O,
    loss_fn: L,
    epochs: NonZeroUsize,
    report_interval: NonZeroUsize,
}

/// What training returns: the trained parameters and the sampled costs.
#[derive(Clone, Debug)]
pub struct TrainOutcome {
    pub network: Network,
    pub history: CostHistory,
}

impl<O, L> Trainer<O, L>
where
    O: Optimizer,
    L: LossFn,
{
    /// Returns a new `Trainer`.
    ///
    /// # Arguments
    /// * `optimizer` - The optimizer used to update the parameters.
    /// * `loss_fn` - The loss function used to measure the network's predictions.
    /// * `epochs` - The amount of epochs to run.
    /// * `report_interval` - The cost is sampled every `report_interval` epochs.
    pub fn new(
        optimizer: O,
        loss_fn: L,
        epochs: NonZeroUsize,
        report_interval: NonZeroUsize,
    ) -> Self {
        Self {
            optimizer,
            loss_fn,
            epochs,
            report_interval,
        }
    }

    /// Trains `network` on `dataset`, mutating its parameters in place.
    ///
    /// # Arguments
    /// * `network` - The network to train.
    /// * `dataset` - The dataset, its features and outputs must match the network's widths.
    ///
    /// # Returns
    /// The sampled cost history or a `SizeMismatch` error, in which case nothing was computed.
    pub fn train(&mut self, network: &mut Network, dataset: &Dataset) -> Result<CostHistory> {
        check_dataset(network, dataset)?;

        let epochs = self.epochs.get();
        let interval = self.report_interval.get();
        let mut history = CostHistory::with_capacity(epochs.div_ceil(interval));

        info!(epochs = epochs, samples = dataset.len(); "training started");

        for epoch in 0..epochs {
            let cache = network.forward(dataset.x())?;
            let cost = self.loss_fn.loss(cache.output(), dataset.y());
            trace!(epoch = epoch, cost = cost; "epoch");

            if epoch % interval == 0 {
                if !cost.is_finite() {
                    warn!(epoch = epoch; "non-finite cost {cost}");
                }

                debug!(epoch = epoch, cost = cost; "sampled cost");
                history.push(epoch, cost);
            }

            let grads = network.backward(&cache, dataset.y(), &self.loss_fn)?;
            network.update(&grads, &mut self.optimizer)?;
        }

        info!(
            samples = history.len(),
            last_cost = history.last().map_or(f64::NAN, |s| s.cost);
            "training finished"
        );

        Ok(history)
    }
}

fn check_dataset(network: &Network, dataset: &Dataset) -> Result<()> {
    if dataset.n_features() != network.input_width() {
        return Err(MlErr::SizeMismatch {
            a: "dataset features",
            b: "input width",
            got: dataset.n_features(),
            expected: network.input_width(),
        });
    }

    if dataset.n_outputs() != network.output_width() {
        return Err(MlErr::SizeMismatch {
            a: "dataset labels",
            b: "output width",
            got: dataset.n_outputs(),
            expected: network.output_width(),
        });
    }

    Ok(())
}

/// Creates the random number generator used for initialization.
///
/// # Arguments
/// * `seed` - An optional seed, a fresh os seeded generator is used when absent.
pub fn generate_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Initializes a network and trains it on `dataset` as `config` says.
///
/// Every configuration value is checked before any computation starts.
///
/// # Arguments
/// * `dataset` - The dataset to train on.
/// * `config` - The training configuration.
///
/// # Returns
/// The trained network and its cost history, or the first configuration error found.
pub fn train(dataset: &Dataset, config: &TrainConfig) -> Result<TrainOutcome> {
    let epochs = NonZeroUsize::new(config.epochs).ok_or(MlErr::ZeroEpochs)?;
    let report_interval =
        NonZeroUsize::new(config.report_interval).ok_or(MlErr::ZeroReportInterval)?;
    let optimizer = GradientDescent::new(config.learning_rate)?;
    let loss_fn = match config.epsilon {
        Some(eps) => BinaryCrossEntropy::with_epsilon(eps)?,
        None => BinaryCrossEntropy::new(),
    };
    let init = ParamInit::normal(config.init_scale)?;

    let mut rng = generate_rng(config.seed);
    let mut network = Network::new(&config.widths, &init, &mut rng)?;

    let mut trainer = Trainer::new(optimizer, loss_fn, epochs, report_interval);
    let history = trainer.train(&mut network, dataset)?;

    Ok(TrainOutcome { network, history })
}
