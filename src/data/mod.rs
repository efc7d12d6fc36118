// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the dataset file on disk and the tensor
// batches the trainer consumes:
//
//   height.pkl / height.json
//       │
//       ▼
//   HeightFileLoader  → reads and validates the four splits
//       │
//       ▼
//   HeightDataset     → implements Burn's Dataset trait
//       │
//       ▼
//   HeightBatcher     → stacks samples into [batch, 1] tensors
//       │
//       ▼
//   DataLoader        → feeds shuffled batches to the training loop

/// Reads and writes the pickle / JSON dataset file
pub mod loader;

/// Implements Burn's Dataset trait over one split
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Seeded two-class height generator
pub mod synthetic;
