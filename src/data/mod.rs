// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer handles everything from the raw array file
// all the way to GPU-ready tensor batches.
//
// The pipeline flows in this order:
//
//   images.npy
//       │
//       ▼
//   NpyLoader         → parses the file, scales pixels to [0,1]
//       │
//       ▼
//   split_fixed       → carves validation / train / test slices
//       │
//       ▼
//   ImageDataset      → implements Burn's Dataset trait
//       │
//       ▼
//   ImageBatcher      → stacks examples into [batch, 784] tensors
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// Each module is responsible for exactly one step.
// This makes each step independently testable and replaceable.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Parses the pre-converted NumPy .npy array file
pub mod loader;

/// Carves the example list into fixed-size dataset slices
pub mod splitter;

/// Implements Burn's Dataset trait for image examples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
