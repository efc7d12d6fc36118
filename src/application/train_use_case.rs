// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the training pipeline in order:
//
//   Step 1: Load the height dataset      (Layer 4 - data)
//   Step 2: Open checkpoint + telemetry  (Layer 6 - infra)
//   Step 3: Run training loop            (Layer 5 - ml)
//
// Only the training split is used; the test split is kept for
// classification.
//
// Reference: Burn Book §5 (Training)

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::loader::HeightFileLoader;
use crate::domain::traits::DatasetSource;
use crate::infra::{checkpoint::CheckpointManager, metrics::MetricsLogger};
use crate::infra::metrics::EpochMetrics;
use crate::ml::model::VaeConfig;
use crate::ml::trainer::run_training;

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run.
// The architecture part (`model`) is written to checkpoint.json so the
// classifier can rebuild the same network later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub dataset:         String,
    pub checkpoint_dir:  String,
    pub telemetry_dir:   String,
    pub epochs:          usize,
    pub batch_size:      usize,
    pub lr:              f64,
    pub max_checkpoints: usize,
    pub seed:            u64,
    pub model:           VaeConfig,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            dataset:         "height.pkl".to_string(),
            checkpoint_dir:  "out_models".to_string(),
            telemetry_dir:   "experiment".to_string(),
            epochs:          3,
            batch_size:      50,
            lr:              1e-3,
            max_checkpoints: 1,
            seed:            42,
            model:           VaeConfig::new(),
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the training pipeline reading the dataset from disk
    pub fn execute(&self) -> Result<Vec<EpochMetrics>> {
        self.execute_with(&HeightFileLoader::new(&self.config.dataset))
    }

    pub fn execute_with(&self, source: &dyn DatasetSource) -> Result<Vec<EpochMetrics>> {
        let cfg = &self.config;

        // ── Step 1: Load the dataset ──────────────────────────────────────────
        let data = source.load()?;
        tracing::info!("Training on {} samples", data.train.len());

        // ── Step 2: Checkpoint manager and telemetry ──────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir)
            .with_max_checkpoints(cfg.max_checkpoints);
        let metrics = MetricsLogger::new(&cfg.telemetry_dir)?;

        // ── Step 3: Run training loop (Layer 5) ───────────────────────────────
        run_training(cfg, data.train, &ckpt_manager, &metrics)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::{exit_status, pipeline_error, PipelineError};

    #[test]
    fn test_missing_dataset_is_dataset_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TrainConfig {
            dataset:        dir.path().join("absent.pkl").display().to_string(),
            checkpoint_dir: dir.path().join("out_models").display().to_string(),
            telemetry_dir:  dir.path().join("experiment").display().to_string(),
            ..TrainConfig::default()
        };

        let result = TrainUseCase::new(cfg).execute().map(|_| ());
        let err = result.as_ref().err().unwrap();
        assert!(matches!(pipeline_error(err), Some(PipelineError::DatasetNotFound { .. })));
        assert_eq!(exit_status(&result), 1);
        assert!(!dir.path().join("out_models").exists());
    }

    #[test]
    fn test_default_config_matches_cli_defaults() {
        let cfg = TrainConfig::default();
        assert_eq!(cfg.epochs, 3);
        assert_eq!(cfg.batch_size, 50);
        assert_eq!(cfg.max_checkpoints, 1);
        assert_eq!(cfg.model.latent_dim, 2);
    }
}
