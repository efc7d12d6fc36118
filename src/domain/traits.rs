// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer programs against these traits rather
// than concrete loaders, so a dataset can come from a pickle
// file, a JSON file or an in-memory fixture in tests.

use anyhow::Result;

use crate::domain::sample::HeightData;

// ─── DatasetSource ────────────────────────────────────────────────────────────
/// Anything that can supply the pre-split height dataset.
///
/// Implementations:
///   - HeightFileLoader → pickle or JSON file on disk
///   - HeightData       → an already-loaded dataset (tests, generator)
pub trait DatasetSource {
    /// Load (trainX, trainY, testX, testY).
    ///
    /// A missing or unreadable backing store must surface as
    /// `PipelineError::DatasetNotFound`.
    fn load(&self) -> Result<HeightData>;
}

impl DatasetSource for HeightData {
    fn load(&self) -> Result<HeightData> {
        Ok(self.clone())
    }
}
