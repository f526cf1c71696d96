pub mod activations;
mod cache;
mod grad;
pub mod layers;
pub mod loss;
mod network;

pub use cache::ForwardCache;
pub use grad::{Gradients, LayerGrad};
pub use network::{DECISION_THRESHOLD, Network, validate_widths};
