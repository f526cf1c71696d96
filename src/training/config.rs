use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Result, initialization::DEFAULT_INIT_SCALE};

/// The raw training configuration, as read from a json file.
///
/// Missing fields take their default value. Values are only checked when training starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct TrainConfig {
    /// Layer widths, input features first and output units last.
    pub widths: Vec<usize>,
    pub learning_rate: f64,
    pub epochs: usize,
    /// The cost is sampled every `report_interval` epochs, starting at epoch 0.
    pub report_interval: usize,
    pub init_scale: f64,
    /// When set, predictions are clamped into `[epsilon, 1 - epsilon]` before computing the cost.
    pub epsilon: Option<f64>,
    pub seed: Option<u64>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            widths: vec![2, 4, 3, 1],
            learning_rate: 0.01,
            epochs: 3000,
            report_interval: 100,
            init_scale: DEFAULT_INIT_SCALE,
            epsilon: None,
            seed: None,
        }
    }
}

impl TrainConfig {
    /// Reads a `TrainConfig` from a json file.
    ///
    /// # Arguments
    /// * `path` - The path of the json file.
    ///
    /// # Returns
    /// The parsed configuration or an io or json error.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config = serde_json::from_str(&raw)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MlErr;

    #[test]
    fn missing_fields_take_defaults() {
        let json = r#"{ "widths": [3, 5, 1], "learning_rate": 0.1, "seed": 9 }"#;
        let config: TrainConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.widths, vec![3, 5, 1]);
        assert_eq!(config.learning_rate, 0.1);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.epochs, 3000);
        assert_eq!(config.report_interval, 100);
        assert_eq!(config.init_scale, DEFAULT_INIT_SCALE);
        assert_eq!(config.epsilon, None);
    }

    #[test]
    fn reads_a_json_file() {
        let path = std::env::temp_dir().join(format!(
            "layered_trainer_config_{}.json",
            std::process::id()
        ));
        let config = TrainConfig {
            epsilon: Some(1e-12),
            seed: Some(3),
            ..Default::default()
        };
        fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();

        let read = TrainConfig::from_json_file(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(read, config);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let res = TrainConfig::from_json_file("/nonexistent/layered-trainer.json");
        assert!(matches!(res, Err(MlErr::Io(_))));
    }

    #[test]
    fn negative_counts_fail_to_parse() {
        let res: std::result::Result<TrainConfig, _> = serde_json::from_str("{ \"epochs\": -1 }");
        assert!(res.is_err());
    }
}
