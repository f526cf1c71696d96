mod bce;
mod loss_fn;

pub use bce::BinaryCrossEntropy;
pub use loss_fn::LossFn;
