//! A feed-forward binary classifier trainer.
//!
//! Fully connected layers with ReLU hidden activations and a sigmoid output, trained with
//! binary cross-entropy and full batch gradient descent.

pub mod arch;
pub mod dataset;
pub mod error;
pub mod initialization;
pub mod metrics;
pub mod optimization;
pub mod training;

pub use error::{MlErr, Result};
