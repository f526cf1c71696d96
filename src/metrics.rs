use ndarray::{ArrayView2, Zip};

use crate::{MlErr, Result};

/// Returns the fraction of predicted classes that match the labels.
///
/// # Arguments
/// * `y_pred` - Predicted classes, as returned by `Network::classify`.
/// * `y` - The true labels.
pub fn accuracy(y_pred: ArrayView2<f64>, y: ArrayView2<f64>) -> Result<f64> {
    if y_pred.dim() != y.dim() {
        return Err(MlErr::SizeMismatch {
            a: "predictions",
            b: "labels",
            got: y_pred.len(),
            expected: y.len(),
        });
    }

    if y.is_empty() {
        return Err(MlErr::EmptyDataset);
    }

    let hits = Zip::from(y_pred)
        .and(y)
        .fold(0usize, |acc, &p, &t| acc + usize::from(p == t));

    Ok(hits as f64 / y.len() as f64)
}
