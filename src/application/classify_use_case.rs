// ============================================================
// Layer 2 — ClassifyUseCase
// ============================================================
// Orchestrates classification in order:
//
//   Step 1: Load the height dataset        (Layer 4 - data)
//   Step 2: Restore the encoder            (Layer 6 - infra)
//   Step 3: Encode train and test heights  (Layer 5 - ml)
//   Step 4: Fit the SVM on train features  (Layer 5 - ml)
//   Step 5: Predict test labels, report    (Layer 3 - domain)
//
// The dataset is read before the checkpoint is looked at, so a
// missing dataset wins over a missing model.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::loader::HeightFileLoader;
use crate::domain::report::ClassificationReport;
use crate::domain::traits::DatasetSource;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::classifier::{FeatureClassifier, DEFAULT_C};
use crate::ml::inferencer::Inferencer;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyConfig {
    pub dataset:        String,
    pub checkpoint_dir: String,
    /// SVM soft-margin penalty
    pub c:              f64,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            dataset:        "height.pkl".to_string(),
            checkpoint_dir: "out_models".to_string(),
            c:              DEFAULT_C,
        }
    }
}

pub struct ClassifyUseCase {
    config: ClassifyConfig,
}

impl ClassifyUseCase {
    pub fn new(config: ClassifyConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<ClassificationReport> {
        self.execute_with(&HeightFileLoader::new(&self.config.dataset))
    }

    pub fn execute_with(&self, source: &dyn DatasetSource) -> Result<ClassificationReport> {
        let cfg = &self.config;

        // ── Step 1: Load the dataset ──────────────────────────────────────────
        let data = source.load()?;

        // ── Step 2: Restore the encoder ───────────────────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir);
        let inferencer: Inferencer = Inferencer::from_checkpoint(&ckpt_manager)?;

        // ── Step 3: Latent features ───────────────────────────────────────────
        let train_features = inferencer.predict_features(data.train.inputs())?.feature_rows();
        let test_features  = inferencer.predict_features(data.test.inputs())?.feature_rows();
        tracing::info!(
            "Encoded {} train / {} test samples into {}-wide feature rows",
            train_features.len(),
            test_features.len(),
            2 * inferencer.latent_dim()
        );

        // ── Step 4: Fit the classifier ────────────────────────────────────────
        let classifier = FeatureClassifier::fit(&train_features, data.train.labels(), cfg.c)?;
        tracing::info!("Classifier classes: {:?}", classifier.classes());

        // ── Step 5: Predict and report ────────────────────────────────────────
        let predicted = classifier.predict(&test_features)?;
        ClassificationReport::new(&predicted, data.test.labels())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::{TrainConfig, TrainUseCase};
    use crate::data::synthetic::generate_heights;
    use crate::domain::error::{exit_status, pipeline_error, PipelineError};

    fn config_in(dir: &std::path::Path) -> ClassifyConfig {
        ClassifyConfig {
            dataset:        dir.join("height.pkl").display().to_string(),
            checkpoint_dir: dir.join("out_models").display().to_string(),
            ..ClassifyConfig::default()
        }
    }

    #[test]
    fn test_missing_dataset_exits_with_one() {
        let dir = tempfile::tempdir().unwrap();
        let result = ClassifyUseCase::new(config_in(dir.path())).execute().map(|_| ());
        assert!(matches!(
            pipeline_error(result.as_ref().err().unwrap()),
            Some(PipelineError::DatasetNotFound { .. })
        ));
        assert_eq!(exit_status(&result), 1);
    }

    #[test]
    fn test_missing_checkpoint_exits_with_zero_and_no_report() {
        let dir  = tempfile::tempdir().unwrap();
        let data = generate_heights(20, 10, 1).unwrap();

        let report = ClassifyUseCase::new(config_in(dir.path())).execute_with(&data);
        assert!(report.is_err());

        let result = report.map(|_| ());
        assert!(matches!(
            pipeline_error(result.as_ref().err().unwrap()),
            Some(PipelineError::NoCheckpointFound(_))
        ));
        assert_eq!(exit_status(&result), 0);
        assert!(!dir.path().join("out_models").exists());
    }

    #[test]
    fn test_train_then_classify() {
        let dir  = tempfile::tempdir().unwrap();
        let data = generate_heights(100, 40, 3).unwrap();

        let train_cfg = TrainConfig {
            checkpoint_dir: dir.path().join("out_models").display().to_string(),
            telemetry_dir:  dir.path().join("experiment").display().to_string(),
            epochs:         1,
            ..TrainConfig::default()
        };
        TrainUseCase::new(train_cfg).execute_with(&data).unwrap();

        let report = ClassifyUseCase::new(config_in(dir.path())).execute_with(&data).unwrap();
        assert_eq!(report.total_support(), 40);
        assert!((0.0..=1.0).contains(&report.accuracy));
        assert!(report.classes.iter().all(|(label, _)| *label == 0 || *label == 1));
    }
}
