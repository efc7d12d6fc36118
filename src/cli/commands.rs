// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands `classify`, `train` and
// `generate` with their flags. Defaults are the fixed paths and
// constants the pipeline has always used.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::classify_use_case::ClassifyConfig;
use crate::application::generate_use_case::GenerateConfig;
use crate::application::train_use_case::TrainConfig;
use crate::ml::classifier::DEFAULT_C;
use crate::ml::model::VaeConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encode the dataset with the trained VAE, fit an SVM, print a report
    Classify(ClassifyArgs),

    /// Train the VAE on the training split and checkpoint it
    Train(TrainArgs),

    /// Write a synthetic two-class height dataset
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Dataset holding (trainX, trainY, testX, testY); .json or pickle
    #[arg(long, default_value = "height.pkl")]
    pub dataset: String,

    /// Directory the training run checkpointed into
    #[arg(long, default_value = "out_models")]
    pub checkpoint_dir: String,

    /// SVM penalty for margin violations
    #[arg(long, default_value_t = DEFAULT_C)]
    pub c: f64,
}

impl From<ClassifyArgs> for ClassifyConfig {
    fn from(a: ClassifyArgs) -> Self {
        ClassifyConfig {
            dataset:        a.dataset,
            checkpoint_dir: a.checkpoint_dir,
            c:              a.c,
        }
    }
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    #[arg(long, default_value = "height.pkl")]
    pub dataset: String,

    /// Where encoder/decoder records and checkpoint.json are written
    #[arg(long, default_value = "out_models")]
    pub checkpoint_dir: String,

    /// Where metrics.csv is appended to
    #[arg(long, default_value = "experiment")]
    pub telemetry_dir: String,

    #[arg(long, default_value_t = 3)]
    pub epochs: usize,

    #[arg(long, default_value_t = 50)]
    pub batch_size: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// How many epoch checkpoints stay on disk
    #[arg(long, default_value_t = 1)]
    pub max_checkpoints: usize,

    /// Seeds weight init, the sampler noise and batch shuffling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            dataset:         a.dataset,
            checkpoint_dir:  a.checkpoint_dir,
            telemetry_dir:   a.telemetry_dir,
            epochs:          a.epochs,
            batch_size:      a.batch_size,
            lr:              a.lr,
            max_checkpoints: a.max_checkpoints,
            seed:            a.seed,
            model:           VaeConfig::new(),
        }
    }
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Output path; a .json extension switches the format to JSON
    #[arg(long, default_value = "height.pkl")]
    pub output: String,

    /// Number of training samples
    #[arg(long, default_value_t = 400)]
    pub train: usize,

    /// Number of test samples
    #[arg(long, default_value_t = 100)]
    pub test: usize,

    #[arg(long, default_value_t = 7)]
    pub seed: u64,
}

impl From<GenerateArgs> for GenerateConfig {
    fn from(a: GenerateArgs) -> Self {
        GenerateConfig { output: a.output, train: a.train, test: a.test, seed: a.seed }
    }
}
