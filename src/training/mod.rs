mod config;
mod history;
mod trainer;

pub use config::TrainConfig;
pub use history::{CostHistory, CostSample};
pub use trainer::{TrainOutcome, Trainer, generate_rng, train};
