use serde::{Deserialize, Serialize};

/// The cost of the network over the whole dataset at a given epoch.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostSample {
    pub epoch: usize,
    pub cost: f64,
}

/// The ordered `(epoch, cost)` samples taken while training.
///
/// Non-finite costs are kept as is.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CostHistory {
    samples: Vec<CostSample>,
}

impl CostHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
        }
    }

    /// Appends a sample. Epochs are expected in increasing order.
    pub fn push(&mut self, epoch: usize, cost: f64) {
        debug_assert!(self.samples.last().is_none_or(|s| s.epoch < epoch));
        self.samples.push(CostSample { epoch, cost });
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&CostSample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&CostSample> {
        self.samples.last()
    }

    /// Returns the cost sampled at `epoch`, if there is one.
    pub fn get(&self, epoch: usize) -> Option<f64> {
        self.samples
            .binary_search_by_key(&epoch, |s| s.epoch)
            .ok()
            .map(|i| self.samples[i].cost)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CostSample> {
        self.samples.iter()
    }
}

impl<'a> IntoIterator for &'a CostHistory {
    type Item = &'a CostSample;
    type IntoIter = std::slice::Iter<'a, CostSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
