// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting persistence concerns:
//
//   checkpoint.rs: Saving and restoring model weights
//                   Encoder and decoder are written as separate
//                   CompactRecorder records; only the encoder is
//                   restored. checkpoint.json points at the newest
//                   epoch and stores the VaeConfig.
//
//   metrics.rs   : Training telemetry
//                   Writes per-epoch loss terms to a CSV file in
//                   the telemetry directory.

/// Model checkpoint saving, retention and restoration
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;
