// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// No other layer imports from burn directly — only this one
// and the data batcher/dataset.
//
// What's in this layer:
//
//   model.rs   — The convolutional VAE architecture
//                Implements encoder and decoder with:
//                • Strided 5x5 convolutions (28→14→7→3)
//                • Batch normalization + ELU after each conv
//                • Dropout before the moments projection
//                • Linear projection to mean ‖ log-variance
//                • Reparameterization-trick latent sampling
//                • Transposed convolutions back up (1→3→7→14→28)
//                • Closed-form latent cost + summed BCE
//                  reconstruction cost
//
//   trainer.rs — The training loop
//                Handles forward pass, loss computation,
//                backward pass, Adam step, validation, and
//                checkpoint saving per epoch
//
//   sampler.rs — The sampling engine
//                Loads a checkpoint, decodes Gaussian noise,
//                converts the output to grayscale bytes
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Kingma & Welling (2013) Auto-Encoding Variational Bayes

/// Convolutional VAE architecture and loss functions
pub mod model;

/// Full training loop with validation and checkpointing
pub mod trainer;

/// Sampling engine — loads checkpoint and decodes noise
pub mod sampler;
