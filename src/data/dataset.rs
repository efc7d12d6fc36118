use burn::data::dataset::Dataset;

use crate::domain::sample::{DatasetSplit, Sample};

/// Burn view over one split, so the DataLoader can shuffle and batch it.
pub struct HeightDataset {
    split: DatasetSplit,
}

impl HeightDataset {
    pub fn new(split: DatasetSplit) -> Self { Self { split } }
}

impl Dataset<Sample> for HeightDataset {
    fn get(&self, index: usize) -> Option<Sample> {
        self.split.get(index)
    }

    fn len(&self) -> usize {
        self.split.len()
    }
}
