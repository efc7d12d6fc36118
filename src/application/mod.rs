// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates the other layers to reach one goal:
// train the VAE, classify with its latent features, or write a
// synthetic dataset.
//
// Rules for this layer:
//   - No tensor math or model code here
//   - No printing here (that's Layer 1)
//   - No direct file access (that's Layer 4 and 6)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The training workflow
pub mod train_use_case;

// The encode → SVM → report workflow
pub mod classify_use_case;

// Synthetic dataset generation
pub mod generate_use_case;
