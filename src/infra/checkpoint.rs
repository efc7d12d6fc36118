// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores VAE weights using Burn's CompactRecorder.
//
// The model is persisted as two independent weight groups:
//
//   group    | saved every epoch | restored on load
//   ---------+-------------------+------------------
//   encoder  | yes               | yes
//   decoder  | yes               | no (freshly initialised)
//
// File layout:
//   out_models/
//     encoder_epoch_3.mpk    ← encoder weights after epoch 3
//     decoder_epoch_3.mpk    ← decoder weights after epoch 3
//     checkpoint.json        ← latest epoch, retained epochs, VaeConfig
//
// Only the newest `max_checkpoints` epochs are kept on disk.
// Record files of older epochs are deleted after each save.

use anyhow::{Context, Result};
use burn::{
    prelude::*,
    record::{CompactRecorder, Record, Recorder},
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::error::PipelineError;
use crate::ml::model::{Vae, VaeConfig};

const STATE_FILE: &str = "checkpoint.json";

/// A separately persisted part of the model with its own restore policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightGroup {
    Encoder,
    Decoder,
}

impl WeightGroup {
    pub const ALL: [WeightGroup; 2] = [WeightGroup::Encoder, WeightGroup::Decoder];

    pub fn name(self) -> &'static str {
        match self {
            WeightGroup::Encoder => "encoder",
            WeightGroup::Decoder => "decoder",
        }
    }

    /// Decoder weights are never restored; callers get a fresh decoder.
    pub fn restore_on_load(self) -> bool {
        matches!(self, WeightGroup::Encoder)
    }

    fn record_stem(self, epoch: usize) -> String {
        format!("{}_epoch_{epoch}", self.name())
    }
}

/// Contents of checkpoint.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointState {
    pub latest_epoch: usize,
    /// Epochs whose record files are still on disk, oldest first
    pub retained:     Vec<usize>,
    /// Architecture needed to rebuild the model before loading weights
    pub model:        VaeConfig,
}

/// A model rebuilt from the newest checkpoint.
pub struct RestoredVae<B: Backend> {
    pub model:  Vae<B>,
    pub config: VaeConfig,
    pub epoch:  usize,
}

pub struct CheckpointManager {
    dir:             PathBuf,
    max_checkpoints: usize,
}

impl CheckpointManager {
    /// The directory is only created on the first save, so restoring from
    /// a directory that does not exist leaves the filesystem untouched.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), max_checkpoints: 1 }
    }

    pub fn with_max_checkpoints(mut self, max_checkpoints: usize) -> Self {
        self.max_checkpoints = max_checkpoints.max(1);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, group: WeightGroup, epoch: usize) -> PathBuf {
        self.dir.join(group.record_stem(epoch))
    }

    fn no_checkpoint(&self) -> anyhow::Error {
        PipelineError::NoCheckpointFound(self.dir.display().to_string()).into()
    }

    /// Save both weight groups for `epoch`, update checkpoint.json and
    /// delete record files that fall outside the retention window.
    pub fn save<B: Backend>(&self, model: &Vae<B>, config: &VaeConfig, epoch: usize) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create checkpoint directory '{}'", self.dir.display()))?;

        self.write_record::<B, _>(model.encoder.clone().into_record(), WeightGroup::Encoder, epoch)?;
        self.write_record::<B, _>(model.decoder.clone().into_record(), WeightGroup::Decoder, epoch)?;

        let mut retained = match self.state() {
            Ok(state) => state.retained,
            Err(_)    => Vec::new(),
        };
        retained.retain(|&e| e != epoch);
        retained.push(epoch);
        let excess = retained.len().saturating_sub(self.max_checkpoints);
        let dropped: Vec<usize> = if excess > 0 {
            retained.drain(..excess).collect()
        } else {
            Vec::new()
        };

        let state = CheckpointState { latest_epoch: epoch, retained, model: config.clone() };
        let state_path = self.dir.join(STATE_FILE);
        fs::write(&state_path, serde_json::to_string_pretty(&state)?)
            .with_context(|| format!("Failed to write '{}'", state_path.display()))?;

        for old in dropped {
            self.remove_epoch(old)?;
        }

        tracing::debug!("Saved checkpoint: epoch {}", epoch);
        Ok(())
    }

    fn write_record<B: Backend, R: Record<B>>(&self, record: R, group: WeightGroup, epoch: usize) -> Result<()> {
        let path = self.record_path(group, epoch);
        <CompactRecorder as Recorder<B>>::record(&CompactRecorder::new(), record, path.clone())
            .with_context(|| format!("Failed to save {} weights to '{}'", group.name(), path.display()))?;
        Ok(())
    }

    fn remove_epoch(&self, epoch: usize) -> Result<()> {
        let prefixes: Vec<String> = WeightGroup::ALL
            .iter()
            .map(|g| format!("{}.", g.record_stem(epoch)))
            .collect();

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else { continue };
            if prefixes.iter().any(|p| name.starts_with(p.as_str())) {
                fs::remove_file(&path)
                    .with_context(|| format!("Cannot remove old checkpoint '{}'", path.display()))?;
                tracing::debug!("Removed old checkpoint file '{}'", path.display());
            }
        }
        Ok(())
    }

    /// Whether any record file for this group and epoch exists on disk.
    fn record_exists(&self, group: WeightGroup, epoch: usize) -> bool {
        let prefix = format!("{}.", group.record_stem(epoch));
        fs::read_dir(&self.dir)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .any(|e| e.file_name().to_str().is_some_and(|n| n.starts_with(&prefix)))
            })
            .unwrap_or(false)
    }

    /// Read checkpoint.json.
    /// A missing directory or state file is `PipelineError::NoCheckpointFound`.
    pub fn state(&self) -> Result<CheckpointState> {
        let path = self.dir.join(STATE_FILE);
        if !path.is_file() {
            return Err(self.no_checkpoint());
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Checkpoint state '{}' is corrupt", path.display()))
    }

    /// Rebuild the model from the newest checkpoint.
    ///
    /// Weight groups whose policy says `restore_on_load` are loaded from
    /// disk; the others keep their fresh initialisation.
    pub fn restore<B: Backend>(&self, device: &B::Device) -> Result<RestoredVae<B>> {
        let state = self.state()?;
        let epoch = state.latest_epoch;
        let mut model = state.model.init::<B>(device);

        for group in WeightGroup::ALL {
            if !group.restore_on_load() {
                tracing::debug!("Not restoring {} weights (always reinitialised)", group.name());
                continue;
            }
            if !self.record_exists(group, epoch) {
                return Err(self.no_checkpoint());
            }
            model = self.load_group(model, group, epoch, device)?;
        }

        tracing::info!("Restored checkpoint from epoch {} in '{}'", epoch, self.dir.display());
        Ok(RestoredVae { model, config: state.model, epoch })
    }

    fn load_group<B: Backend>(
        &self,
        model:  Vae<B>,
        group:  WeightGroup,
        epoch:  usize,
        device: &B::Device,
    ) -> Result<Vae<B>> {
        let path = self.record_path(group, epoch);
        Ok(match group {
            WeightGroup::Encoder => {
                let record = load_record::<B, _>(&path, device)?;
                Vae { encoder: model.encoder.load_record(record), ..model }
            }
            WeightGroup::Decoder => {
                let record = load_record::<B, _>(&path, device)?;
                Vae { decoder: model.decoder.load_record(record), ..model }
            }
        })
    }
}

fn load_record<B: Backend, R: Record<B>>(path: &Path, device: &B::Device) -> Result<R> {
    <CompactRecorder as Recorder<B>>::load(&CompactRecorder::new(), path.to_path_buf(), device)
        .with_context(|| format!("Cannot load checkpoint '{}'", path.display()))
}
