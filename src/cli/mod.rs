// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with `clap`.
// All work is delegated to Layer 2 (application).
//
//   1. `classify`: encode, fit the SVM, print the report (default)
//   2. `train`   : train the VAE and checkpoint it
//   3. `generate`: write a synthetic height dataset
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use std::io::Write;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, GenerateArgs, TrainArgs};

use crate::application::classify_use_case::{ClassifyConfig, ClassifyUseCase};
use crate::domain::error::pipeline_error;

#[derive(Parser, Debug)]
#[command(
    name = "height-vae",
    version,
    about = "Learn a 2-D latent code for heights with a VAE, then classify on it with a linear SVM."
)]
pub struct Cli {
    /// Runs `classify` with its defaults when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Route the subcommand to its use case and write user-facing
    /// output to `out`: the report, a one-line summary, or the short
    /// message for a recognised pipeline error. Logging never goes here.
    pub fn run(self, out: &mut impl Write) -> Result<()> {
        let result = match self.command {
            Some(Commands::Classify(args))  => run_classify(args.into(), out),
            Some(Commands::Train(args))     => run_train(args, out),
            Some(Commands::Generate(args))  => run_generate(args, out),
            None                            => run_classify(ClassifyConfig::default(), out),
        };

        if let Some(known) = result.as_ref().err().and_then(pipeline_error) {
            if let Err(e) = writeln!(out, "{}", known.user_message()) {
                tracing::warn!("Cannot write status message: {e}");
            }
        }
        result
    }
}

fn run_classify(config: ClassifyConfig, out: &mut impl Write) -> Result<()> {
    tracing::info!("Classifying '{}' with checkpoints from '{}'", config.dataset, config.checkpoint_dir);
    let report = ClassifyUseCase::new(config).execute()?;
    writeln!(out, "{report}")?;
    Ok(())
}

fn run_train(args: TrainArgs, out: &mut impl Write) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on: {}", args.dataset);
    let checkpoint_dir = args.checkpoint_dir.clone();
    let history = TrainUseCase::new(args.into()).execute()?;

    if let Some(last) = history.last() {
        writeln!(out, "Training complete. Final loss {:.4}, checkpoint saved to '{}'.", last.loss, checkpoint_dir)?;
    }
    Ok(())
}

fn run_generate(args: GenerateArgs, out: &mut impl Write) -> Result<()> {
    use crate::application::generate_use_case::GenerateUseCase;

    let output = args.output.clone();
    let data = GenerateUseCase::new(args.into()).execute()?;
    writeln!(out, "Wrote {} train / {} test heights to '{}'.", data.train.len(), data.test.len(), output)?;
    Ok(())
}
