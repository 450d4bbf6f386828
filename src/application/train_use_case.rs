// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load the array file       (Layer 4 - data)
//   Step 2: Split val/train/test      (Layer 4 - data)
//   Step 3: Build Burn datasets       (Layer 4 - data)
//   Step 4: Save config               (Layer 6 - infra)
//   Step 5: Run training loop         (Layer 5 - ml)
//
// Reference: Burn Book §5 (Training)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::data::{
    dataset::ImageDataset,
    loader::NpyLoader,
    splitter::{split_fixed, TEST_SIZE, VALIDATION_SIZE},
};
use crate::domain::traits::ExampleSource;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::trainer::run_training;

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run.
// Serialisable so it can be saved to disk and reloaded for sampling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_path:         String,
    pub work_dir:          String,
    pub batch_size:        usize,
    pub updates_per_epoch: usize,
    pub max_epoch:         usize,
    pub learning_rate:     f64,
    pub hidden_size:       usize,
    pub dropout:           f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_path:         "data/images.npy".to_string(),
            work_dir:          "work".to_string(),
            batch_size:        32,
            updates_per_epoch: 200,
            max_epoch:         1,
            learning_rate:     1e-2,
            hidden_size:       10,
            dropout:           0.1,
        }
    }
}

impl TrainConfig {
    /// Directory checkpoints, config and metrics are written to
    pub fn checkpoint_dir(&self) -> PathBuf {
        Path::new(&self.work_dir).join("checkpoints")
    }

    /// Directory generated sample images are written to
    pub fn images_dir(&self) -> PathBuf {
        Path::new(&self.work_dir).join("imgs")
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
// Owns the config and runs the full training pipeline.
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    /// Create a new TrainUseCase with the given configuration
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1: Load the pre-converted array file ────────────────────────
        tracing::info!("Loading dataset from '{}'", cfg.data_path);
        let loader   = NpyLoader::new(&cfg.data_path);
        let examples = loader.load_all()?;

        // ── Step 2: Fixed-size validation/train/test split ────────────────────
        // Validation is the head of the file, test the tail;
        // the test slice is held out entirely from this run.
        let splits = split_fixed(examples, VALIDATION_SIZE, TEST_SIZE)?;
        tracing::info!(
            "Split: {} train, {} validation, {} test (held out)",
            splits.train.len(),
            splits.validation.len(),
            splits.test.len(),
        );

        // ── Step 3: Build Burn datasets ───────────────────────────────────────
        // ImageDataset implements Burn's Dataset trait so the
        // DataLoader can call .get(index) and .len() on it
        let train_dataset = ImageDataset::new(splits.train);
        let val_dataset   = ImageDataset::new(splits.validation);

        // ── Step 4: Save config for sampling ──────────────────────────────────
        // The sampler needs to know the latent size to rebuild the model
        let ckpt_manager = CheckpointManager::new(cfg.checkpoint_dir());
        ckpt_manager.save_config(cfg)?;

        // ── Step 5: Run training loop (Layer 5) ───────────────────────────────
        run_training(cfg, train_dataset, val_dataset, ckpt_manager)?;

        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_json_round_trip() {
        let cfg = TrainConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: TrainConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.batch_size, cfg.batch_size);
        assert_eq!(back.hidden_size, cfg.hidden_size);
        assert_eq!(back.work_dir, cfg.work_dir);
    }

    #[test]
    fn test_derived_directories() {
        let cfg = TrainConfig { work_dir: "run1".to_string(), ..Default::default() };
        assert_eq!(cfg.checkpoint_dir(), Path::new("run1").join("checkpoints"));
        assert_eq!(cfg.images_dir(), Path::new("run1").join("imgs"));
    }
}
