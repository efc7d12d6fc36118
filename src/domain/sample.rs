// ============================================================
// Layer 3 — Height Samples and Dataset Splits
// ============================================================
// A sample is one scalar height paired with an integer class
// label. Samples are grouped into two fixed splits (train and
// test) that are loaded once and never mutated.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::PipelineError;

/// One height measurement and its class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub height: f32,
    pub label:  i32,
}

/// Parallel input / label sequences.
///
/// Invariant: `inputs.len() == labels.len()`. The only public
/// constructor checks it, so every split in the program holds it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetSplit {
    inputs: Vec<f32>,
    labels: Vec<i32>,
}

impl DatasetSplit {
    /// Build a split, rejecting mismatched lengths.
    /// `name` is only used in the error message ("train" / "test").
    pub fn new(name: &str, inputs: Vec<f32>, labels: Vec<i32>) -> Result<Self> {
        if inputs.len() != labels.len() {
            return Err(PipelineError::InvalidDataset(format!(
                "{name} split has {} inputs but {} labels",
                inputs.len(),
                labels.len()
            ))
            .into());
        }
        Ok(Self { inputs, labels })
    }

    pub fn inputs(&self) -> &[f32] {
        &self.inputs
    }

    pub fn labels(&self) -> &[i32] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Sample> {
        Some(Sample {
            height: *self.inputs.get(index)?,
            label:  *self.labels.get(index)?,
        })
    }

    #[cfg(test)]
    pub fn samples(&self) -> impl Iterator<Item = Sample> + '_ {
        self.inputs
            .iter()
            .zip(self.labels.iter())
            .map(|(&height, &label)| Sample { height, label })
    }
}

/// The full pre-split dataset: (trainX, trainY, testX, testY).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightData {
    pub train: DatasetSplit,
    pub test:  DatasetSplit,
}
