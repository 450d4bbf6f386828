// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Full train + validation loop using Burn's DataLoader and Adam.
//
// Key Burn insight:
//   - Training uses MyBackend (Autodiff<Wgpu>) for gradients
//   - model.valid() returns model on MyInnerBackend (Wgpu)
//   - Validation batcher must also use MyInnerBackend
//   - BatchNorm and Dropout switch to inference behaviour on
//     the inner backend
//
// Epoch structure follows the reference VAE setup: each epoch
// runs a FIXED number of optimizer updates (updates_per_epoch),
// cycling the shuffled DataLoader as often as needed, rather
// than one pass over the dataset.
//
// Reference: Burn Book §5, Kingma & Welling (2013),
//            Kingma & Ba (2015) Adam

use anyhow::{bail, Result};
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::ImageBatcher, dataset::ImageDataset};
use crate::domain::image_example::FLAT_SIZE;
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::model::{Vae, VaeConfig};

type MyBackend      = burn::backend::Autodiff<burn::backend::Wgpu>;
type MyInnerBackend = burn::backend::Wgpu;

pub fn run_training(
    cfg:           &TrainConfig,
    train_dataset: ImageDataset,
    val_dataset:   ImageDataset,
    ckpt_manager:  CheckpointManager,
) -> Result<()> {
    let device = burn::backend::wgpu::WgpuDevice::default();
    tracing::info!("Using WGPU device: {:?}", device);
    train_loop(cfg, train_dataset, val_dataset, ckpt_manager, device)
}

fn train_loop(
    cfg:           &TrainConfig,
    train_dataset: ImageDataset,
    val_dataset:   ImageDataset,
    ckpt_manager:  CheckpointManager,
    device:        burn::backend::wgpu::WgpuDevice,
) -> Result<()> {

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = VaeConfig::new(cfg.hidden_size, cfg.dropout);
    let mut model: Vae<MyBackend> = model_cfg.init(&device);
    tracing::info!("Model ready: hidden_size={}", cfg.hidden_size);

    // ── Adam optimiser ────────────────────────────────────────────────────────
    // m = β1*m + (1-β1)*g        (mean)
    // v = β2*v + (1-β2)*g²       (variance)
    // θ = θ - lr * m / (√v + ε)  (update)
    // ε = 1.0 matches the reference setup — the summed (not averaged)
    // loss produces large gradients, and the big epsilon damps the
    // early steps where v is still near zero.
    let optim_cfg = AdamConfig::new().with_epsilon(1.0);
    let mut optim = optim_cfg.init();

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    let train_batcher = ImageBatcher::<MyBackend>::new(device.clone());
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(42)
        .num_workers(1)
        .build(train_dataset);

    // ── Validation data loader (InnerBackend — no autodiff overhead) ──────────
    let val_batcher = ImageBatcher::<MyInnerBackend>::new(device.clone());
    let val_loader  = DataLoaderBuilder::new(val_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(val_dataset);

    let metrics_logger = MetricsLogger::new(cfg.checkpoint_dir())?;

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.max_epoch {

        // ── Training phase: a fixed number of updates ─────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut updates        = 0usize;

        while updates < cfg.updates_per_epoch {
            let updates_before = updates;

            for batch in train_loader.iter() {
                let (loss, _) = model.forward_loss(batch.images);

                let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
                train_loss_sum += loss_val;

                // Backward pass + Adam update
                let grads = loss.backward();
                let grads = GradientsParams::from_grads(grads, &model);
                model = optim.step(cfg.learning_rate, model, grads);

                updates += 1;
                if updates >= cfg.updates_per_epoch {
                    break;
                }
            }

            if updates == updates_before {
                bail!("Training DataLoader produced no batches");
            }
        }

        // Per-pixel-per-example normalization, the reference convention:
        // the raw loss is summed over every pixel in every batch.
        let avg_train_loss =
            train_loss_sum / (updates * FLAT_SIZE * cfg.batch_size) as f64;

        // ── Validation phase ──────────────────────────────────────────────────
        // model.valid() → Vae<MyInnerBackend>
        // dropout disabled, batch norm uses running statistics
        let model_valid = model.valid();

        let mut val_loss_sum = 0.0f64;
        let mut val_examples = 0usize;

        for batch in val_loader.iter() {
            let examples_in_batch = batch.images.dims()[0];

            let (loss, _) = model_valid.forward_loss(batch.images);
            val_loss_sum += loss.into_scalar().elem::<f64>();
            val_examples += examples_in_batch;
        }

        let avg_val_loss = if val_examples > 0 {
            val_loss_sum / (val_examples * FLAT_SIZE) as f64
        } else {
            f64::NAN
        };

        println!(
            "Epoch {:>3}/{} | train_loss={:.6} | val_loss={:.6}",
            epoch, cfg.max_epoch, avg_train_loss, avg_val_loss,
        );

        metrics_logger.log(&EpochMetrics::new(epoch, avg_train_loss, avg_val_loss))?;

        ckpt_manager.save_model(&model, epoch)?;
        tracing::info!("Checkpoint saved for epoch {}", epoch);
    }

    tracing::info!("Training complete!");
    Ok(())
}
