// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `train` and `sample`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::train_use_case::TrainConfig;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the VAE on a pre-converted image array file
    Train(TrainArgs),

    /// Decode random noise through a trained checkpoint into PNG images
    Sample(SampleArgs),
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Path to the pre-converted .npy file of uint8 pixels
    #[arg(long, default_value = "data/images.npy")]
    pub data_path: String,

    /// Working directory for checkpoints, metrics, and samples
    #[arg(long, default_value = "work")]
    pub work_dir: String,

    /// Number of images processed together in one forward pass
    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Number of optimizer updates per epoch — each epoch runs
    /// exactly this many steps, cycling the data as needed
    #[arg(long, default_value_t = 200)]
    pub updates_per_epoch: usize,

    /// Number of training epochs
    #[arg(long, default_value_t = 1)]
    pub max_epoch: usize,

    /// How fast the model learns — too high causes instability,
    /// too low causes slow convergence
    #[arg(long, default_value_t = 1e-2)]
    pub learning_rate: f64,

    /// Size of the latent vector — each image is compressed into
    /// this many Gaussian (mean, variance) pairs
    #[arg(long, default_value_t = 10)]
    pub hidden_size: usize,

    /// Dropout probability before the moments projection —
    /// randomly zeroes activations during training
    #[arg(long, default_value_t = 0.1)]
    pub dropout: f64,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// This is the boundary between Layer 1 and Layer 2 —
/// the application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_path:         a.data_path,
            work_dir:          a.work_dir,
            batch_size:        a.batch_size,
            updates_per_epoch: a.updates_per_epoch,
            max_epoch:         a.max_epoch,
            learning_rate:     a.learning_rate,
            hidden_size:       a.hidden_size,
            dropout:           a.dropout,
        }
    }
}

/// All arguments for the `sample` command
#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Working directory used during training (holds the checkpoints)
    #[arg(long, default_value = "work")]
    pub work_dir: String,

    /// Number of sample images to generate
    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_train_args_convert_to_config() {
        let args = TrainArgs {
            data_path:         "d.npy".to_string(),
            work_dir:          "w".to_string(),
            batch_size:        16,
            updates_per_epoch: 50,
            max_epoch:         3,
            learning_rate:     5e-3,
            hidden_size:       20,
            dropout:           0.2,
        };
        let cfg: TrainConfig = args.into();
        assert_eq!(cfg.data_path, "d.npy");
        assert_eq!(cfg.batch_size, 16);
        assert_eq!(cfg.updates_per_epoch, 50);
        assert_eq!(cfg.max_epoch, 3);
        assert_eq!(cfg.hidden_size, 20);
    }
}
