// ============================================================
// Layer 5 — Sampler
// ============================================================
use anyhow::Result;

use crate::domain::image_example::FLAT_SIZE;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::{Vae, VaeConfig};

type InferBackend = burn::backend::Wgpu;

pub struct Sampler {
    model:  Vae<InferBackend>,
    device: burn::backend::wgpu::WgpuDevice,
}

impl Sampler {
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager) -> Result<Self> {
        let device = burn::backend::wgpu::WgpuDevice::default();
        let cfg    = ckpt_manager.load_config()?;

        // Dropout 0.0 — sampling is a pure decoder pass and the
        // encoder is only carried so the checkpoint record matches
        let model_cfg = VaeConfig::new(cfg.hidden_size, 0.0);
        let model: Vae<InferBackend> = model_cfg.init(&device);
        let model = ckpt_manager.load_model(model, &device)?;

        tracing::info!("Model loaded from checkpoint");
        Ok(Self { model, device })
    }

    /// Decode `count` latent vectors drawn from the prior into
    /// grayscale byte images, one Vec<u8> of FLAT_SIZE per image.
    pub fn generate(&self, count: usize) -> Result<Vec<Vec<u8>>> {
        // [count, 784], sigmoid output already in [0, 1]
        let decoded = self.model.sample(count, &self.device);

        let intensities: Vec<f32> = decoded
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow::anyhow!("Cannot read decoded tensor: {e:?}"))?;

        let images: Vec<Vec<u8>> = intensities
            .chunks(FLAT_SIZE)
            .map(|pixels| {
                pixels
                    .iter()
                    .map(|&p| (p.clamp(0.0, 1.0) * 255.0).round() as u8)
                    .collect()
            })
            .collect();

        tracing::debug!("Decoded {} sample images", images.len());
        Ok(images)
    }
}
