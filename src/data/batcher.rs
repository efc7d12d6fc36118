// ============================================================
// Layer 4 — Height Batcher
// ============================================================
// Implements Burn's Batcher trait to stack a Vec<Sample> into
// one input tensor of shape [batch_size, 1].
//
// Labels are not batched: the VAE is trained without them and
// only the classifier (which never sees tensors) uses labels.

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::domain::sample::Sample;

#[derive(Debug, Clone)]
pub struct HeightBatch<B: Backend> {
    /// Heights, shape [batch_size, 1]
    pub inputs: Tensor<B, 2>,
}

#[derive(Clone, Debug)]
pub struct HeightBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> HeightBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

/// Turn a slice of heights into a column tensor [N, 1].
pub fn heights_to_tensor<B: Backend>(heights: &[f32], device: &B::Device) -> Tensor<B, 2> {
    Tensor::<B, 1>::from_floats(heights, device).reshape([heights.len(), 1])
}

impl<B: Backend> Batcher<Sample, HeightBatch<B>> for HeightBatcher<B> {
    fn batch(&self, items: Vec<Sample>) -> HeightBatch<B> {
        let heights: Vec<f32> = items.iter().map(|s| s.height).collect();
        HeightBatch { inputs: heights_to_tensor(&heights, &self.device) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_batch_is_a_column() {
        let batcher = HeightBatcher::<NdArray>::new(Default::default());
        let items = vec![
            Sample { height: 1.6, label: 0 },
            Sample { height: 1.7, label: 1 },
            Sample { height: 1.8, label: 1 },
        ];
        let batch = batcher.batch(items);
        assert_eq!(batch.inputs.dims(), [3, 1]);

        let values = batch.inputs.into_data().to_vec::<f32>().unwrap();
        assert_eq!(values, vec![1.6, 1.7, 1.8]);
    }
}
