// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Mini-batch VAE training with Burn's DataLoader and Adam.
//
// Per batch:   forward_loss → backward → Adam step
// Per epoch:   log averaged loss terms, checkpoint both weight groups
//
// The labels are not used here: the VAE is unsupervised.
//
// Reference: Kingma & Welling (2014) Auto-Encoding Variational Bayes
//            Kingma & Ba (2015) Adam

use anyhow::{ensure, Result};
use burn::{
    data::dataloader::DataLoaderBuilder,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::HeightBatcher, dataset::HeightDataset};
use crate::domain::sample::DatasetSplit;
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::model::Vae;
use crate::ml::{device, TrainBackend};

pub fn run_training(
    cfg:          &TrainConfig,
    train_split:  DatasetSplit,
    ckpt_manager: &CheckpointManager,
    metrics:      &MetricsLogger,
) -> Result<Vec<EpochMetrics>> {
    let device = device();
    tracing::info!("Using device: {:?}", device);
    train_loop::<TrainBackend>(cfg, train_split, ckpt_manager, metrics, &device)
}

fn train_loop<B: AutodiffBackend>(
    cfg:          &TrainConfig,
    train_split:  DatasetSplit,
    ckpt_manager: &CheckpointManager,
    metrics:      &MetricsLogger,
    device:       &B::Device,
) -> Result<Vec<EpochMetrics>> {
    ensure!(!train_split.is_empty(), "training split is empty");
    ensure!(cfg.batch_size > 0, "batch size must be positive");

    B::seed(cfg.seed);

    // ── Build model ───────────────────────────────────────────────────────────
    let mut model: Vae<B> = cfg.model.init(device);
    tracing::info!(
        "VAE ready: input={} hidden={}/{} latent={}",
        cfg.model.input_dim,
        cfg.model.encoder_hidden,
        cfg.model.decoder_hidden,
        cfg.model.latent_dim
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    let mut optim = AdamConfig::new()
        .with_beta_1(0.9)
        .with_beta_2(0.999)
        .with_epsilon(1e-8)
        .init();

    // ── Training data loader ──────────────────────────────────────────────────
    let sample_count = train_split.len();
    let loader = DataLoaderBuilder::new(HeightBatcher::<B>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(HeightDataset::new(train_split));

    // ── Epoch loop ────────────────────────────────────────────────────────────
    let mut history = Vec::with_capacity(cfg.epochs);

    for epoch in 1..=cfg.epochs {
        let mut loss_sum = 0.0f64;
        let mut kl_sum   = 0.0f64;
        let mut rec_sum  = 0.0f64;
        let mut batches  = 0usize;

        for batch in loader.iter() {
            let out = model.forward_loss(batch.inputs);

            loss_sum += out.loss.clone().into_scalar().elem::<f64>();
            kl_sum   += out.kl.into_scalar().elem::<f64>();
            rec_sum  += out.reconstruction.into_scalar().elem::<f64>();
            batches  += 1;

            let grads = out.loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let n = batches.max(1) as f64;
        let summary = EpochMetrics::new(epoch, loss_sum / n, kl_sum / n, rec_sum / n);

        tracing::info!(
            "Epoch {:>3}/{} | samples={} | loss={:.4} | kl={:.4} | reconstruction={:.4}",
            epoch, cfg.epochs, sample_count, summary.loss, summary.kl, summary.reconstruction,
        );
        if !summary.is_finite() {
            tracing::warn!("Epoch {} produced a non-finite loss", epoch);
        }

        metrics.log(&summary)?;
        ckpt_manager.save(&model, &cfg.model, epoch)?;
        tracing::info!("Checkpoint saved for epoch {}", epoch);

        history.push(summary);
    }

    tracing::info!("Training complete!");
    Ok(history)
}
