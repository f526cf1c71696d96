use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

use rand_distr::NormalError;

/// The result type used in the entire trainer.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The trainer's error type.
///
/// Every variant but `Io` and `Json` is a configuration error: it is detected before any
/// training computation starts. Non-finite costs are not errors, they are recorded as is.
#[derive(Debug)]
pub enum MlErr {
    TooFewLayers {
        got: usize,
    },
    InvalidLayerWidth {
        layer: usize,
    },
    InvalidActivation {
        layer: usize,
    },
    InvalidLearningRate(f64),
    InvalidInitScale(f64),
    InvalidEpsilon(f64),
    ZeroEpochs,
    ZeroReportInterval,
    EmptyDataset,
    InvalidLabel {
        sample: usize,
        value: f64,
    },
    SizeMismatch {
        a: &'static str,
        b: &'static str,
        got: usize,
        expected: usize,
    },
    Distribution(String),
    Io(io::Error),
    Json(serde_json::Error),
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MlErr::TooFewLayers { got } => format!(
                "A network needs at least an input and an output width, got {got} widths"
            ),
            MlErr::InvalidLayerWidth { layer } => {
                format!("The width of layer {layer} must be greater than zero")
            }
            MlErr::InvalidActivation { layer } => format!(
                "Layer {layer} must be activated with ReLU if hidden or with a sigmoid if it's the output"
            ),
            MlErr::InvalidLearningRate(lr) => {
                format!("The learning rate must be a positive finite number, got {lr}")
            }
            MlErr::InvalidInitScale(scale) => {
                format!("The initialization scale must be a positive finite number, got {scale}")
            }
            MlErr::InvalidEpsilon(eps) => {
                format!("The loss epsilon must lie inside (0, 0.5), got {eps}")
            }
            MlErr::ZeroEpochs => "The amount of epochs must be greater than zero".to_string(),
            MlErr::ZeroReportInterval => {
                "The report interval must be greater than zero".to_string()
            }
            MlErr::EmptyDataset => "The dataset has no samples".to_string(),
            MlErr::InvalidLabel { sample, value } => {
                format!("Labels must be 0 or 1, sample {sample} has label {value}")
            }
            MlErr::SizeMismatch {
                a,
                b,
                got,
                expected,
            } => format!(
                "There's a size mismatch between {a} and {b}, got {got} and expected {expected}"
            ),
            MlErr::Distribution(msg) => format!("Invalid distribution: {msg}"),
            MlErr::Io(e) => format!("io error: {e}"),
            MlErr::Json(e) => format!("invalid json: {e}"),
        };

        write!(f, "{s}")
    }
}

impl Error for MlErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MlErr::Io(e) => Some(e),
            MlErr::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<NormalError> for MlErr {
    fn from(value: NormalError) -> Self {
        Self::Distribution(value.to_string())
    }
}

impl From<io::Error> for MlErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for MlErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
