// ============================================================
// Layer 2 — SampleUseCase
// ============================================================
// Loads the trained model from the latest checkpoint, decodes
// a batch of Gaussian noise, and writes the results as PNG
// files into {work_dir}/imgs/.

use anyhow::Result;
use std::path::Path;

use crate::infra::{checkpoint::CheckpointManager, image_store::ImageStore};
use crate::ml::sampler::Sampler;

pub struct SampleUseCase {
    work_dir:   String,
    batch_size: usize,
}

impl SampleUseCase {
    pub fn new(work_dir: String, batch_size: usize) -> Self {
        Self { work_dir, batch_size }
    }

    /// Generate and persist a batch of samples.
    /// Returns the number of images written.
    pub fn execute(&self) -> Result<usize> {
        let ckpt_manager =
            CheckpointManager::new(Path::new(&self.work_dir).join("checkpoints"));
        let sampler = Sampler::from_checkpoint(&ckpt_manager)?;

        let images = sampler.generate(self.batch_size)?;

        let store = ImageStore::new(Path::new(&self.work_dir).join("imgs"))?;
        for (index, pixels) in images.iter().enumerate() {
            store.save_grayscale(index, pixels)?;
        }

        tracing::info!(
            "Wrote {} sample images to '{}'",
            images.len(),
            store.dir().display()
        );

        Ok(images.len())
    }
}
