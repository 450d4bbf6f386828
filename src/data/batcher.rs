// ============================================================
// Layer 4 — Image Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<ImageExample>
// into GPU-ready tensors.
//
// How batching works here:
//   Input:  Vec of N ImageExamples, each with FLAT_SIZE pixels
//   Output: ImageBatch with one tensor of shape [N, FLAT_SIZE]
//
//   We flatten all pixels into one long Vec, then reshape:
//   [i1_p1, ..., i1_p784, i2_p1, ..., iN_p784] → [N, 784]
//
// Why is this easy here?
//   Because every example already has exactly FLAT_SIZE pixels —
//   images are fixed-size, so no padding is ever needed.
//
// Reference: Burn Book §4 (Batcher)

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::domain::image_example::ImageExample;

// ─── ImageBatch ───────────────────────────────────────────────────────────────
/// A batch of flattened images ready for the model forward pass.
///
/// B is the Burn Backend (e.g. Wgpu, NdArray) —
/// generic so the same batcher works on any device.
#[derive(Debug, Clone)]
pub struct ImageBatch<B: Backend> {
    /// Normalized pixel intensities — shape: [batch_size, FLAT_SIZE]
    /// Each row is one flattened 28x28 image in [0, 1]
    pub images: Tensor<B, 2>,
}

// ─── ImageBatcher ─────────────────────────────────────────────────────────────
/// The batcher struct — holds the target device so tensors
/// are created on the correct GPU/CPU.
#[derive(Clone, Debug)]
pub struct ImageBatcher<B: Backend> {
    /// The device to create tensors on (e.g. GPU index 0)
    pub device: B::Device,
}

impl<B: Backend> ImageBatcher<B> {
    /// Create a new batcher for the given device
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

// This is what makes ImageBatcher work with Burn's DataLoader.
// The DataLoader calls .batch(items) with each mini-batch of examples.
impl<B: Backend> Batcher<ImageExample, ImageBatch<B>> for ImageBatcher<B> {
    fn batch(&self, items: Vec<ImageExample>) -> ImageBatch<B> {
        let batch_size = items.len();
        // All examples have the same pixel count (fixed-size images)
        let flat_size = items[0].pixels.len();

        // Flatten all pixels into one contiguous Vec<f32>
        let pixels_flat: Vec<f32> = items
            .iter()
            .flat_map(|ex| ex.pixels.iter().copied())
            .collect();

        // One 1D tensor, then reshape to [batch, flat]
        let images = Tensor::<B, 1>::from_floats(pixels_flat.as_slice(), &self.device)
            .reshape([batch_size, flat_size]);

        ImageBatch { images }
    }
}
