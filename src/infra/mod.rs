// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Handles all cross-cutting concerns that don't belong in
// any specific business layer:
//
//   checkpoint.rs  — Saving and loading model weights
//                    Uses Burn's CompactRecorder to serialise
//                    model parameters to disk. Also saves and
//                    loads TrainConfig as JSON so sampling can
//                    rebuild the exact architecture.
//
//   metrics.rs     — Training metrics logging
//                    Writes epoch-level losses to a CSV file
//                    for later analysis and plotting.
//
//   image_store.rs — Sample image persistence
//                    Writes decoded grayscale images as PNG
//                    files into the samples directory.
//
// Why is this a separate layer?
//   These concerns are used by multiple other layers but
//   don't belong to any one of them. Keeping them here
//   prevents duplication and makes implementations easy to
//   swap (e.g. file checkpoints for cloud storage).
//
// Reference: Rust Book §7 (Modules)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;

/// PNG writer for generated samples
pub mod image_store;
