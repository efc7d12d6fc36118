// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits describing the height
// classification problem.
//
// Rules for this layer:
//   - NO Burn or linfa types allowed here
//   - NO file I/O
//   - Only plain data, pure functions and traits
//
// Everything here can be unit tested without a tensor backend.

// Height samples and the train/test splits
pub mod sample;

// Encoder outputs and the [mu | logvar] feature rows built from them
pub mod latent;

// Per-class precision / recall / F1 report
pub mod report;

// Fatal pipeline errors and their exit codes
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;
