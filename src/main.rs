use std::env;

use anyhow::Context;
use log::info;

use layered_trainer::{
    dataset::Dataset,
    metrics,
    training::{self, TrainConfig},
};

const DEFAULT_SAMPLES: usize = 400;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match env::args().nth(1) {
        Some(path) => TrainConfig::from_json_file(&path)
            .with_context(|| format!("failed to read config from {path}"))?,
        None => TrainConfig::default(),
    };

    let samples = match env::var("SAMPLES") {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("SAMPLES must be a positive integer, got {raw}"))?,
        Err(_) => DEFAULT_SAMPLES,
    };

    // the dataset gets its own stream so it doesn't alias the initialization draws
    let mut rng = training::generate_rng(config.seed.map(|seed| seed.wrapping_add(1)));
    let dataset = Dataset::linearly_separable(samples, &mut rng)?;
    info!(samples = dataset.len(); "generated dataset");

    let outcome = training::train(&dataset, &config)?;

    let y_pred = outcome.network.classify(dataset.x())?;
    let accuracy = metrics::accuracy(y_pred.view(), dataset.y())?;
    info!(accuracy = accuracy; "training accuracy");

    println!("{}", serde_json::to_string_pretty(&outcome.history)?);

    Ok(())
}
