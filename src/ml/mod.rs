// ============================================================
// Layer 5 — ML / Model Layer (Burn + linfa)
// ============================================================
// Model, training and classifier code. The application layer
// hands over plain vectors and gets plain vectors back.
//
//   model.rs     : encoder, sampler, decoder and the VAE losses
//   trainer.rs   : mini-batch Adam loop with per-epoch checkpoints
//   inferencer.rs: restores the encoder and extracts latent features
//   classifier.rs: one-vs-rest linear SVM over [mu | logvar] rows
//
// Backend: NdArray on the CPU by default. Building with
// `--features wgpu` swaps in the GPU backend.
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// VAE architecture and loss terms
pub mod model;

/// Training loop with checkpointing
pub mod trainer;

/// Restores a checkpoint and computes latent features
pub mod inferencer;

/// Linear SVM on latent features
pub mod classifier;

#[cfg(not(feature = "wgpu"))]
pub type InferBackend = burn::backend::NdArray;

#[cfg(feature = "wgpu")]
pub type InferBackend = burn::backend::Wgpu;

pub type TrainBackend = burn::backend::Autodiff<InferBackend>;

pub fn device() -> <InferBackend as burn::tensor::backend::Backend>::Device {
    Default::default()
}
