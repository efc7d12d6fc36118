// ============================================================
// Layer 6 — Training Telemetry
// ============================================================
// Records per-epoch scalar summaries of VAE training to a CSV
// file in the telemetry directory (experiment/ by default), so
// learning curves can be plotted with any external tool.
//
// Output file: experiment/metrics.csv
//
//   epoch,loss,kl,reconstruction
//   1,0.912345,0.004210,0.908135
//   2,0.871002,0.010388,0.860614
//
// The program only ever appends to this file; it is never read
// back.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

const HEADER: &str = "epoch,loss,kl,reconstruction";

/// Batch-averaged loss terms for one training epoch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Mean of (KL + reconstruction) over all batches
    pub loss: f64,

    /// Mean KL divergence to the standard normal prior
    pub kl: f64,

    /// Mean sigmoid cross-entropy reconstruction term
    pub reconstruction: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, loss: f64, kl: f64, reconstruction: f64) -> Self {
        Self { epoch, loss, kl, reconstruction }
    }

    pub fn is_finite(&self) -> bool {
        self.loss.is_finite() && self.kl.is_finite() && self.reconstruction.is_finite()
    }
}

/// Appends epoch metrics to `<dir>/metrics.csv`.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create the telemetry directory and write the CSV header if the
    /// file is new. Existing files are appended to across runs.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir: PathBuf = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create telemetry directory '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "{HEADER}")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(f, "{},{:.6},{:.6},{:.6}", m.epoch, m.loss, m.kl, m.reconstruction)?;

        tracing::debug!(
            "Logged epoch {} metrics: loss={:.4}, kl={:.4}, reconstruction={:.4}",
            m.epoch,
            m.loss,
            m.kl,
            m.reconstruction,
        );
        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}
