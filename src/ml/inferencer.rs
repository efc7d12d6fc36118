// ============================================================
// Layer 5 — Inferencer
// ============================================================
use anyhow::Result;
use burn::prelude::*;

use crate::data::batcher::heights_to_tensor;
use crate::domain::latent::LatentFeatures;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::{Encoder, VaeConfig};
use crate::ml::{device, InferBackend};

/// Deterministic feature extractor built from the restored encoder.
///
/// The decoder is never needed here, the sampler neither: features are
/// the Gaussian parameters themselves.
pub struct Inferencer<B: Backend = InferBackend> {
    encoder: Encoder<B>,
    config:  VaeConfig,
    device:  B::Device,
}

impl Inferencer<InferBackend> {
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager) -> Result<Self> {
        Self::from_checkpoint_on(ckpt_manager, device())
    }
}

impl<B: Backend> Inferencer<B> {
    pub fn from_checkpoint_on(ckpt_manager: &CheckpointManager, device: B::Device) -> Result<Self> {
        let restored = ckpt_manager.restore::<B>(&device)?;
        tracing::info!(
            "Encoder loaded from epoch {} checkpoint in '{}'",
            restored.epoch,
            ckpt_manager.dir().display()
        );
        Ok(Self { encoder: restored.model.encoder, config: restored.config, device })
    }

    pub fn latent_dim(&self) -> usize {
        self.config.latent_dim
    }

    /// Encode every height in a single pass.
    pub fn predict_features(&self, heights: &[f32]) -> Result<LatentFeatures> {
        if heights.is_empty() {
            return Ok(LatentFeatures { mu: Vec::new(), logvar: Vec::new() });
        }

        let input  = heights_to_tensor::<B>(heights, &self.device);
        let latent = self.encoder.forward(input);

        let mu = latent
            .mu
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow::anyhow!("mu readback: {e:?}"))?;
        let logvar = latent
            .logvar
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow::anyhow!("logvar readback: {e:?}"))?;

        LatentFeatures::from_flat(mu, logvar, self.config.latent_dim)
    }
}
